use ledring::{domain::ArtyA7, prelude::*};

fn ws2812_100mhz() -> TimingSpec {
    resolve(100_000_000.0, 0.80e-6, 0.45e-6, 24).unwrap()
}

mod ws2812_frame {
    use super::*;

    #[test]
    fn cycle_counts() {
        let timing = ws2812_100mhz();

        assert_eq!(timing.high_cycles(), 80);
        assert_eq!(timing.low_cycles(), 45);
        assert_eq!(timing.frame_cycles(), 3000);
        assert_eq!(Protocol::WS2812.resolve_for::<ArtyA7>().unwrap(), timing);
    }

    #[test]
    fn frame_done_at_last_tick() {
        let mut seq = Sequencer::new(ws2812_100mhz());
        let mut clk = Clock::for_domain::<ArtyA7>();

        for tick in 1..=3000 {
            clk.tick();
            seq.step(&clk);
            assert_eq!(seq.frame_done(), tick == 3000, "tick {tick}");
        }

        assert_eq!(seq.state().bit_index(), 24);
        assert_eq!(seq.frames_sent(), 1);
        assert_eq!(clk.time(), 30_000_000);
    }

    #[test]
    fn pulse_windows() {
        let levels = Sequencer::new(ws2812_100mhz())
            .simulate()
            .take(3000)
            .collect::<Vec<_>>();

        for (bit, window) in levels.chunks(125).enumerate() {
            assert_eq!(window.len(), 125);
            assert!(window[..80].iter().all(|level| *level), "bit {bit}");
            assert!(window[80..].iter().all(|level| !*level), "bit {bit}");
        }
    }

    #[test]
    fn line_low_after_frame() {
        let mut sim = Sequencer::new(ws2812_100mhz()).simulate();

        assert_eq!(sim.by_ref().skip(3000).take(500).filter(|l| *l).count(), 0);
        assert!(sim.source().frame_done());
        assert_eq!(sim.source().frames_sent(), 1);
    }
}

mod restart {
    use super::*;

    #[test]
    fn frames_are_identical() {
        let timing = ws2812_100mhz();
        let frame_len = timing.frame_cycles() as usize;
        let mut sim = Sequencer::idle(timing).simulate();

        let mut frames = vec![];
        for _ in 0..3 {
            sim.source_mut().start_frame().unwrap();
            frames.push(sim.by_ref().take(frame_len).collect::<Vec<_>>());
            assert!(sim.source().frame_done());
        }

        assert_eq!(frames[0], frames[1]);
        assert_eq!(frames[1], frames[2]);
        assert_eq!(sim.source().frames_sent(), 3);
    }

    #[test]
    fn busy_at_bit_five() {
        let timing = ws2812_100mhz();
        let mut sim = Sequencer::new(timing).simulate();

        sim.by_ref().take(5 * 125 + 10).for_each(drop);
        let state = sim.source().state();
        assert_eq!(state.bit_index(), 5);

        let err = sim.source_mut().start_frame().unwrap_err();
        assert!(matches!(err, Error::Busy { bit_index: 5, .. }));
        assert_eq!(sim.source().state(), state);
    }

    #[test]
    fn fastest_legal_train() {
        let timing = TimingSpec::from_cycles(1, 1, 24).unwrap();
        let levels = Sequencer::new(timing)
            .simulate()
            .take(48)
            .collect::<Vec<_>>();

        assert!(levels.iter().step_by(2).all(|level| *level));
        assert!(levels.iter().skip(1).step_by(2).all(|level| !*level));
    }
}

mod config_errors {
    use super::*;

    #[test]
    fn no_sequencer_for_invalid_timing() {
        let err = resolve(1_000_000.0, 0.80e-6, 0.45e-6, 24).unwrap_err();
        assert!(err.is_invalid_timing());

        let err = resolve(100_000_000.0, 0.80e-6, 0.45e-6, 0).unwrap_err();
        assert!(err.is_invalid_timing());
    }
}

mod ring {
    use super::*;

    #[test]
    fn refreshed_ring() {
        let timing = ws2812_100mhz();
        // frame every 50 us
        let refresh = RiseEvery::from_period(100e6, 50e-6).unwrap();
        let ring = Ring::new(Sequencer::new(timing), Blink::new(24)).with_refresh(refresh);

        let mut sim = ring.simulate();
        let highs = sim.by_ref().take(20_000).filter(|out| out.data).count();

        // 4 complete frames, 24 * 80 ticks HIGH each
        assert_eq!(sim.source().sequencer().frames_sent(), 4);
        assert_eq!(highs, 4 * 24 * 80);
    }
}
