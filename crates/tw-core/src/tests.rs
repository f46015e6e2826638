//! Unit tests for tw-core primitives.

#[cfg(test)]
mod ids {
    use crate::{AgentKey, AgentKind, AgentRef, BreedId, LinkId, PatchId, TurtleId};

    #[test]
    fn index_roundtrip() {
        let id = PatchId(42);
        assert_eq!(id.index(), 42);
        assert_eq!(PatchId::try_from(42usize).unwrap(), id);
    }

    #[test]
    fn invalid_sentinels_are_max() {
        assert_eq!(PatchId::INVALID.0, u32::MAX);
        assert_eq!(BreedId::INVALID.0, u16::MAX);
    }

    #[test]
    fn pseudo_breeds() {
        assert_eq!(BreedId::TURTLES.index(), 0);
        assert_eq!(BreedId::LINKS.index(), 1);
    }

    #[test]
    fn handle_display() {
        assert_eq!(TurtleId::new(3, 1).to_string(), "TurtleId(3v1)");
        assert_eq!(LinkId::new(0, 0).slot(), 0);
    }

    #[test]
    fn link_keys_order_by_ends_then_breed() {
        let a = AgentKey::link(0, 5, BreedId(3));
        let b = AgentKey::link(1, 0, BreedId(2));
        let c = AgentKey::link(1, 0, BreedId(4));
        assert!(a < b);
        assert!(b < c);
    }

    #[test]
    fn agent_ref_kind() {
        let r: AgentRef = PatchId(1).into();
        assert_eq!(r.kind(), AgentKind::Patch);
        assert_eq!(AgentKind::Link.to_string(), "link");
    }
}

#[cfg(test)]
mod value {
    use crate::Value;

    #[test]
    fn default_is_nobody() {
        assert_eq!(Value::default(), Value::Nobody);
    }

    #[test]
    fn accessors() {
        assert_eq!(Value::from(2.5).as_number(), Some(2.5));
        assert_eq!(Value::from(true).as_bool(), Some(true));
        assert_eq!(Value::from("x").as_str(), Some("x"));
        assert_eq!(Value::from("x").as_number(), None);
    }

    #[test]
    fn display_integers_without_fraction() {
        assert_eq!(Value::Number(3.0).to_string(), "3");
        assert_eq!(Value::Number(0.5).to_string(), "0.5");
        let list = Value::List(vec![Value::Number(1.0), Value::Boolean(false)]);
        assert_eq!(list.to_string(), "[1 false]");
    }
}

#[cfg(test)]
mod rng {
    use crate::{RngStreams, WorldRng};

    #[test]
    fn same_seed_same_stream() {
        let mut a = WorldRng::new(7);
        let mut b = WorldRng::new(7);
        for _ in 0..100 {
            assert_eq!(a.next_int(1000), b.next_int(1000));
        }
        assert_eq!(a.next_double().to_bits(), b.next_double().to_bits());
    }

    #[test]
    fn next_int_in_range() {
        let mut r = WorldRng::new(1);
        for n in 1..50 {
            assert!(r.next_int(n) < n);
        }
        assert_eq!(r.next_int(0), 0);
    }

    #[test]
    fn reseed_restarts() {
        let mut r = WorldRng::new(11);
        let first: Vec<usize> = (0..10).map(|_| r.next_int(100)).collect();
        r.reseed(11);
        let again: Vec<usize> = (0..10).map(|_| r.next_int(100)).collect();
        assert_eq!(first, again);
    }

    #[test]
    fn aux_draws_do_not_shift_main() {
        let mut s1 = RngStreams::new(5, None);
        let mut s2 = RngStreams::new(5, None);
        for _ in 0..17 {
            s1.aux.next_double();
        }
        for _ in 0..20 {
            assert_eq!(s1.main.next_int(1 << 20), s2.main.next_int(1 << 20));
        }
    }

    #[test]
    fn shuffle_is_a_permutation() {
        let mut r = WorldRng::new(3);
        let mut v: Vec<u32> = (0..64).collect();
        r.shuffle(&mut v);
        let mut sorted = v.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..64).collect::<Vec<_>>());
    }
}

#[cfg(test)]
mod geom {
    use crate::geom::{finite, heading_from_delta, normalize_heading, subtract_headings, wrap};
    use crate::EngineError;

    #[test]
    fn wrap_inside_is_identity() {
        assert_eq!(wrap(1.25, -2.5, 2.5), 1.25);
        assert_eq!(wrap(-2.5, -2.5, 2.5), -2.5);
    }

    #[test]
    fn wrap_upper_edge_is_exclusive() {
        assert_eq!(wrap(2.5, -2.5, 2.5), -2.5);
        assert_eq!(wrap(3.0, -2.5, 2.5), -2.0);
    }

    #[test]
    fn wrap_below_min() {
        assert_eq!(wrap(-3.0, -2.5, 2.5), 2.0);
        // an exact multiple of the width below min lands on min, not max
        assert_eq!(wrap(-7.5, -2.5, 2.5), -2.5);
    }

    #[test]
    fn headings_normalize() {
        assert_eq!(normalize_heading(-90.0), 270.0);
        assert_eq!(normalize_heading(720.0), 0.0);
        assert_eq!(normalize_heading(359.5), 359.5);
    }

    #[test]
    fn subtract_takes_short_way() {
        assert_eq!(subtract_headings(10.0, 350.0), 20.0);
        assert_eq!(subtract_headings(350.0, 10.0), -20.0);
    }

    #[test]
    fn cardinal_headings_are_exact() {
        assert_eq!(heading_from_delta(1.0, 0.0, 0.0, 0.0).unwrap(), 90.0);
        assert_eq!(heading_from_delta(-1.0, 0.0, 0.0, 0.0).unwrap(), 270.0);
        assert_eq!(heading_from_delta(0.0, 2.0, 0.0, 0.0).unwrap(), 0.0);
        assert_eq!(heading_from_delta(0.0, -2.0, 0.0, 0.0).unwrap(), 180.0);
    }

    #[test]
    fn diagonal_heading() {
        let h = heading_from_delta(1.0, 1.0, 0.0, 0.0).unwrap();
        assert!((h - 45.0).abs() < 1e-9, "got {h}");
        let h = heading_from_delta(-1.0, -1.0, 0.0, 0.0).unwrap();
        assert!((h - 225.0).abs() < 1e-9, "got {h}");
    }

    #[test]
    fn zero_delta_has_no_heading() {
        assert!(heading_from_delta(0.0, 0.0, 1.0, 1.0).is_err());
    }

    #[test]
    fn only_finite_values_pass() {
        assert_eq!(finite(-3.5, "xcor").unwrap(), -3.5);
        for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert!(matches!(finite(bad, "heading"), Err(EngineError::Domain(_))));
        }
    }
}

#[cfg(test)]
mod config {
    use crate::WorldConfig;

    #[test]
    fn centered_dimensions() {
        let c = WorldConfig::centered(2, 3);
        assert_eq!(c.width(), 5);
        assert_eq!(c.height(), 7);
        assert_eq!(c.patch_count(), 35);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn origin_must_be_inside() {
        let mut c = WorldConfig::centered(2, 2);
        c.min_pxcor = 1;
        c.max_pxcor = 4;
        assert!(c.validate().is_err());
    }
}

#[cfg(test)]
mod ticks {
    use crate::{EngineError, TickCounter};

    #[test]
    fn cleared_counter_errors() {
        let t = TickCounter::new();
        assert_eq!(t.ticks(), Err(EngineError::TicksNotStarted));
    }

    #[test]
    fn tick_and_advance() {
        let mut t = TickCounter::new();
        t.reset();
        t.tick().unwrap();
        t.advance(0.5).unwrap();
        assert_eq!(t.ticks().unwrap(), 1.5);
        assert!(t.advance(-1.0).is_err());
    }
}

#[cfg(test)]
mod error {
    use crate::{AgentKind, EngineError, Severity};

    #[test]
    fn severity_classes() {
        assert_eq!(EngineError::BeyondEdge.severity(), Severity::Domain);
        let e = EngineError::PatchNotNumeric {
            pxcor: 0,
            pycor: 1,
            var:   "heat".into(),
            found: "\"hot\"".into(),
        };
        assert_eq!(e.severity(), Severity::Topology);
        assert!(e.is_recoverable());
        assert!(!EngineError::UnknownBreed("wolves".into()).is_recoverable());
        assert!(EngineError::Halted.is_recoverable());
        assert!(EngineError::DeadAgent(AgentKind::Turtle).is_recoverable());
    }

    #[test]
    fn messages() {
        assert_eq!(
            EngineError::BeyondEdge.to_string(),
            "cannot move turtle beyond the world's edge"
        );
    }
}

#[cfg(test)]
mod air {
    use std::time::{Duration, Instant};

    use crate::{AirFlag, AirMonitor};

    #[test]
    fn take_air_consumes() {
        let f = AirFlag::new();
        assert!(!f.take_air());
        f.request_air();
        assert!(f.take_air());
        assert!(!f.take_air());
    }

    #[test]
    fn halt_is_sticky() {
        let f = AirFlag::new();
        f.request_halt();
        assert!(f.halt_requested());
        assert!(f.take_air());
        assert!(f.halt_requested());
        f.clear_halt();
        assert!(!f.halt_requested());
    }

    #[test]
    fn monitor_raises_flag() {
        let f = AirFlag::new();
        let monitor = AirMonitor::spawn(f.clone(), Duration::from_millis(1)).unwrap();
        let deadline = Instant::now() + Duration::from_secs(5);
        while !f.take_air() {
            assert!(Instant::now() < deadline, "monitor never raised the flag");
            std::thread::sleep(Duration::from_millis(1));
        }
        drop(monitor);
    }
}
