//! Unit tests for npc-core primitives.

#[cfg(test)]
mod ids {
    use crate::{ActivityId, AgentId};

    #[test]
    fn index_roundtrip() {
        let id = AgentId(42);
        assert_eq!(id.index(), 42);
        assert_eq!(AgentId::try_from(42usize).unwrap(), id);
    }

    #[test]
    fn ordering() {
        assert!(ActivityId(1) < ActivityId(2));
    }

    #[test]
    fn display() {
        assert_eq!(AgentId(7).to_string(), "AgentId(7)");
        assert_eq!(ActivityId(3).to_string(), "ActivityId(3)");
    }
}

#[cfg(test)]
mod time {
    use crate::{Clock, SimClock, TimeOfDay};

    #[test]
    fn hm_and_components() {
        let t = TimeOfDay::hm(8, 21);
        assert_eq!(t.0, 8 * 60 + 21);
        assert_eq!(t.hour(), 8);
        assert_eq!(t.minute(), 21);
        assert_eq!(t.day(), 0);
    }

    #[test]
    fn arithmetic() {
        let t = TimeOfDay::hm(8, 20);
        assert_eq!(t + 1, TimeOfDay::hm(8, 21));
        assert_eq!(TimeOfDay::hm(8, 30) - TimeOfDay::hm(8, 10), 20);
        // Subtraction saturates rather than panicking.
        assert_eq!(TimeOfDay::hm(8, 0) - TimeOfDay::hm(9, 0), 0);
    }

    #[test]
    fn display_and_parse() {
        assert_eq!(TimeOfDay::hm(8, 5).to_string(), "08:05");
        assert_eq!(TimeOfDay::dhm(2, 23, 59).to_string(), "d2 23:59");
        assert_eq!("08:05".parse::<TimeOfDay>().unwrap(), TimeOfDay::hm(8, 5));
        assert_eq!("d1 00:30".parse::<TimeOfDay>().unwrap(), TimeOfDay::dhm(1, 0, 30));
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!("8h05".parse::<TimeOfDay>().is_err());
        assert!("24:00".parse::<TimeOfDay>().is_err());
        assert!("x1 08:00".parse::<TimeOfDay>().is_err());
    }

    #[test]
    fn clock_advances_and_pauses() {
        let mut clock = SimClock::new(TimeOfDay::hm(6, 0), 5);
        clock.advance();
        assert_eq!(clock.now(), TimeOfDay::hm(6, 5));

        clock.pause();
        assert!(clock.is_paused());
        clock.advance();
        assert_eq!(clock.now(), TimeOfDay::hm(6, 5));
        assert_eq!(clock.ticks_elapsed, 1);

        clock.resume();
        clock.advance();
        assert_eq!(clock.now(), TimeOfDay::hm(6, 10));
    }
}

#[cfg(test)]
mod config {
    use crate::{SimConfig, TimeOfDay};

    #[test]
    fn defaults() {
        let cfg = SimConfig::default();
        assert_eq!(cfg.idle_timeout_minutes, 10);
        assert_eq!(cfg.push_back_gap_minutes, 1);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let cfg = SimConfig::from_toml_str(
            r#"
            start_time       = "08:00"
            minutes_per_tick = 2
            total_ticks      = 30
            "#,
        )
        .unwrap();
        assert_eq!(cfg.start_time, TimeOfDay::hm(8, 0));
        assert_eq!(cfg.minutes_per_tick, 2);
        assert_eq!(cfg.idle_timeout_minutes, 10);
        assert_eq!(cfg.end_time(), TimeOfDay::hm(9, 0));
    }

    #[test]
    fn numeric_start_time_accepted() {
        let cfg = SimConfig::from_toml_str("start_time = 480").unwrap();
        assert_eq!(cfg.start_time, TimeOfDay::hm(8, 0));
    }

    #[test]
    fn zero_tick_length_rejected() {
        assert!(SimConfig::from_toml_str("minutes_per_tick = 0").is_err());
    }

    #[test]
    fn unknown_key_rejected() {
        assert!(SimConfig::from_toml_str("tick_secs = 3600").is_err());
    }
}

#[cfg(test)]
mod rng {
    use crate::{AgentId, AgentRng};

    #[test]
    fn deterministic_same_seed() {
        let mut r1 = AgentRng::new(12345, AgentId(0));
        let mut r2 = AgentRng::new(12345, AgentId(0));
        for _ in 0..100 {
            let a: u32 = r1.gen_range(0..1000);
            let b: u32 = r2.gen_range(0..1000);
            assert_eq!(a, b);
        }
    }

    #[test]
    fn choose_empty_is_none() {
        let mut rng = AgentRng::new(0, AgentId(0));
        let empty: [u8; 0] = [];
        assert!(rng.choose(&empty).is_none());
        assert_eq!(rng.choose(&[9]), Some(&9));
    }
}
