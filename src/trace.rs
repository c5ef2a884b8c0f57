//! VCD waveform dumps.
//!
//! Variables are declared up front through [`TraceVars`]; a composite value
//! declares one VCD variable per field, named `parent$field`. At dump time
//! [`Tracer::trace`] walks the same fields in the same order, so a value only
//! has to remember the id code of its first variable.

use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::Path,
};

use derive_where::derive_where;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
pub use vcd::{IdCode, Value as TraceValue};
use vcd::{TimescaleUnit, VarType, Writer as VcdWriter};

use crate::sequencer::{Phase, SequencerState};

pub trait Traceable {
    fn add_vars(vars: &mut TraceVars);

    fn trace(&self, id: &mut IdCode, tracer: &mut Tracer) -> io::Result<()>;
}

impl<'a, T: Traceable> Traceable for &'a T {
    #[inline]
    fn add_vars(vars: &mut TraceVars) {
        T::add_vars(vars);
    }

    #[inline]
    fn trace(&self, id: &mut IdCode, tracer: &mut Tracer) -> io::Result<()> {
        (*self).trace(id, tracer)
    }
}

pub(crate) fn bool_to_vcd(b: bool) -> TraceValue {
    if b {
        TraceValue::V1
    } else {
        TraceValue::V0
    }
}

impl Traceable for bool {
    fn add_vars(vars: &mut TraceVars) {
        vars.add_ty(TraceTy::Wire);
    }

    fn trace(&self, id: &mut IdCode, tracer: &mut Tracer) -> io::Result<()> {
        tracer.change_wire(id, bool_to_vcd(*self))
    }
}

impl Traceable for u32 {
    fn add_vars(vars: &mut TraceVars) {
        vars.add_ty(TraceTy::Bus(u32::BITS));
    }

    fn trace(&self, id: &mut IdCode, tracer: &mut Tracer) -> io::Result<()> {
        let value = *self;
        tracer.change_bus(
            id,
            (0..u32::BITS)
                .rev()
                .map(|idx| bool_to_vcd((value >> idx) & 1 == 1)),
        )
    }
}

impl Traceable for Phase {
    fn add_vars(vars: &mut TraceVars) {
        vars.add_ty(TraceTy::Wire);
    }

    fn trace(&self, id: &mut IdCode, tracer: &mut Tracer) -> io::Result<()> {
        tracer.change_wire(id, bool_to_vcd(self.level()))
    }
}

impl Traceable for SequencerState {
    fn add_vars(vars: &mut TraceVars) {
        vars.add_field::<u32>("bit_index");
        vars.add_field::<Phase>("phase");
        vars.add_field::<u32>("phase_elapsed");
        vars.add_field::<bool>("output_level");
    }

    fn trace(&self, id: &mut IdCode, tracer: &mut Tracer) -> io::Result<()> {
        self.bit_index().trace(id, tracer)?;
        self.phase().trace(id, tracer)?;
        self.phase_elapsed().trace(id, tracer)?;
        self.output_level().trace(id, tracer)
    }
}

#[derive(Debug, Clone, Copy)]
pub enum TraceTy {
    Wire,
    Bus(u32),
}

impl TraceTy {
    fn as_pair(&self) -> (u32, VarType) {
        match self {
            Self::Wire => (1, VarType::Wire),
            Self::Bus(w) => (*w, VarType::Integer),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Command {
    PushSym(&'static str),
    Ty(TraceTy),
    Pop,
}

#[derive(Debug, Default)]
pub struct TraceVars {
    commands: SmallVec<[Command; 16]>,
}

impl TraceVars {
    pub fn add_var<T: Traceable>(mut self, sym: &'static str, _var: &T) -> Self {
        self.add_field::<T>(sym);
        self
    }

    pub fn add_field<T: Traceable>(&mut self, sym: &'static str) {
        self.commands.push(Command::PushSym(sym));
        T::add_vars(self);
        self.commands.push(Command::Pop);
    }

    #[inline]
    pub fn add_ty(&mut self, ty: TraceTy) {
        self.commands.push(Command::Ty(ty));
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Timescale {
    S(u32),
    MS(u32),
    US(u32),
    NS(u32),
    PS(u32),
}

impl Timescale {
    fn into_pair(self) -> (u32, TimescaleUnit) {
        match self {
            Self::S(ts) => (ts, TimescaleUnit::S),
            Self::MS(ts) => (ts, TimescaleUnit::MS),
            Self::US(ts) => (ts, TimescaleUnit::US),
            Self::NS(ts) => (ts, TimescaleUnit::NS),
            Self::PS(ts) => (ts, TimescaleUnit::PS),
        }
    }
}

impl Default for Timescale {
    fn default() -> Self {
        Self::PS(1)
    }
}

#[derive(Debug, Default)]
struct VarName {
    stack: Vec<usize>,
    inner: String,
}

impl VarName {
    fn push_sym(&mut self, sym: &'static str) {
        self.stack.push(self.inner.len());
        if !self.inner.is_empty() {
            self.inner.push('$');
        }
        self.inner.push_str(sym);
    }

    fn pop(&mut self) {
        if let Some(idx) = self.stack.pop() {
            self.inner.truncate(idx);
        }
    }

    #[inline]
    fn is_top(&self) -> bool {
        self.stack.is_empty()
    }
}

#[derive_where(Debug)]
pub struct Tracer {
    syms: FxHashMap<&'static str, IdCode>,
    mod_name: &'static str,
    timescale: Timescale,
    #[derive_where(skip)]
    vcd: VcdWriter<Box<dyn Write>>,
}

impl Tracer {
    pub fn open_vcd<P: AsRef<Path>>(
        path: P,
        vars: TraceVars,
        mod_name: &'static str,
        timescale: Option<Timescale>,
    ) -> io::Result<Self> {
        let file = BufWriter::new(File::create(path)?);
        Self::new(Box::new(file), vars, mod_name, timescale)
    }

    pub fn new(
        writer: Box<dyn Write>,
        vars: TraceVars,
        mod_name: &'static str,
        timescale: Option<Timescale>,
    ) -> io::Result<Self> {
        let mut vcd = VcdWriter::new(writer);
        let timescale = timescale.unwrap_or_default();
        let (ts, unit) = timescale.into_pair();
        vcd.timescale(ts, unit)?;
        vcd.add_module(mod_name)?;

        let mut syms = FxHashMap::default();
        let mut var_name = VarName::default();
        // top-level symbol and the id code of its first variable
        let mut top: Option<(&'static str, Option<IdCode>)> = None;
        for command in vars.commands {
            match command {
                Command::PushSym(sym) => {
                    if var_name.is_top() {
                        top = Some((sym, None));
                    }
                    var_name.push_sym(sym);
                }
                Command::Ty(ty) => {
                    let (width, var_ty) = ty.as_pair();
                    let id = vcd.add_var(var_ty, width, &var_name.inner, None)?;
                    if let Some((_, code @ None)) = top.as_mut() {
                        *code = Some(id);
                    }
                }
                Command::Pop => {
                    var_name.pop();
                    if var_name.is_top() {
                        if let Some((sym, Some(code))) = top.take() {
                            syms.insert(sym, code);
                        }
                    }
                }
            }
        }
        vcd.upscope()?;
        vcd.enddefinitions()?;

        Ok(Self {
            syms,
            mod_name,
            timescale,
            vcd,
        })
    }

    #[inline]
    pub fn mod_name(&self) -> &'static str {
        self.mod_name
    }

    #[inline]
    pub fn timescale(&self) -> Timescale {
        self.timescale
    }

    pub fn dump_time(&mut self, time: u64) -> io::Result<()> {
        self.vcd.timestamp(time)
    }

    /// Dumps `value` under the top-level variable `sym`. Unknown symbols are
    /// ignored.
    pub fn trace<T: Traceable>(&mut self, sym: &'static str, value: &T) -> io::Result<()> {
        if let Some(id) = self.syms.get(sym) {
            let mut id = *id;
            value.trace(&mut id, self)?;
        }

        Ok(())
    }

    #[inline]
    pub fn change_wire(&mut self, id: &mut IdCode, value: TraceValue) -> io::Result<()> {
        self.vcd.change_scalar(*id, value)?;
        *id = id.next();

        Ok(())
    }

    #[inline]
    pub fn change_bus(
        &mut self,
        id: &mut IdCode,
        values: impl IntoIterator<Item = TraceValue>,
    ) -> io::Result<()> {
        self.vcd.change_vector(*id, values)?;
        *id = id.next();

        Ok(())
    }

    #[inline]
    pub fn flush(&mut self) -> io::Result<()> {
        self.vcd.flush()
    }
}
