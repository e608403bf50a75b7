use petri_cover_lib::{
    automaton::{
        marking::{Marking, PlaceIndex},
        omega::ExtendedValue,
        petri_net::PetriNet,
    },
    error::CoverabilityError,
};

const OMEGA: ExtendedValue = ExtendedValue::Omega;

fn fin(n: u64) -> ExtendedValue {
    ExtendedValue::Finite(n)
}

#[test]
fn omega_is_above_every_count() {
    assert!(OMEGA > fin(u64::MAX));
    assert!(fin(3) < fin(4));
    assert_eq!(OMEGA.cmp(&OMEGA), std::cmp::Ordering::Equal);
    assert_eq!(fin(2).checked_add(fin(3)).unwrap(), fin(5));
    assert_eq!(fin(2).checked_add(OMEGA).unwrap(), OMEGA);
    assert_eq!(OMEGA.checked_add(fin(2)).unwrap(), OMEGA);
}

#[test]
fn addition_never_wraps() {
    assert!(matches!(
        fin(u64::MAX).checked_add(fin(1)),
        Err(CoverabilityError::CountOverflow { .. })
    ));
    assert_eq!(fin(u64::MAX - 1).checked_add(fin(1)).unwrap(), fin(u64::MAX));
}

#[test]
fn subtraction_stays_non_negative() {
    assert_eq!(fin(5).checked_sub(fin(2)).unwrap(), fin(3));
    assert_eq!(OMEGA.checked_sub(fin(100)).unwrap(), OMEGA);
    assert!(matches!(
        fin(1).checked_sub(fin(2)),
        Err(CoverabilityError::ArithmeticInvariantViolated { .. })
    ));
    assert!(matches!(
        fin(1).checked_sub(OMEGA),
        Err(CoverabilityError::ArithmeticInvariantViolated { .. })
    ));
}

#[test]
fn covers_and_dominates() {
    let a = Marking::from(vec![fin(1), OMEGA, fin(0)]);
    let b = Marking::from(vec![1u64, 7, 0]);

    assert!(a.covers(&b));
    assert!(a.dominates(&b));
    assert!(!b.covers(&a));

    assert!(a.covers(&a));
    assert!(!a.dominates(&a));

    // incomparable
    let c = Marking::from(vec![0u64, 1]);
    let d = Marking::from(vec![1u64, 0]);
    assert!(!c.covers(&d) && !d.covers(&c));
}

#[test]
fn accelerate_widens_only_grown_places() {
    let ancestor = Marking::from(vec![1u64, 0, 2]);
    let current = Marking::from(vec![1u64, 3, 5]);

    let accelerated = current.accelerate(&ancestor);
    assert_eq!(accelerated, Marking::from(vec![fin(1), OMEGA, OMEGA]));
    assert_eq!(
        accelerated.new_omega_places(&current).collect::<Vec<_>>(),
        vec![PlaceIndex::new(1), PlaceIndex::new(2)]
    );
    assert_eq!(accelerated.omega_count(), 2);

    // an ω that was already there stays
    let with_omega = Marking::from(vec![OMEGA, fin(1)]);
    let accelerated = with_omega.accelerate(&Marking::from(vec![OMEGA, fin(0)]));
    assert_eq!(accelerated, Marking::from(vec![OMEGA, OMEGA]));
}

#[test]
fn marking_display_and_serde() {
    let marking = Marking::from(vec![fin(2), OMEGA]);
    assert_eq!(marking.to_string(), "[2, ω]");

    let json = serde_json::to_string(&marking).unwrap();
    assert_eq!(json, r#"[2,"ω"]"#);
    assert_eq!(serde_json::from_str::<Marking>(&json).unwrap(), marking);
    assert_eq!(
        serde_json::from_str::<Marking>(r#"[2, "omega"]"#).unwrap(),
        marking
    );
}

#[test]
fn firing_respects_weights() {
    let mut net = PetriNet::new(vec!["P0".to_string(), "P1".to_string()]);
    let t = net.add_transition(
        "move",
        vec![(2, PlaceIndex::new(0))],
        vec![(3, PlaceIndex::new(1))],
    );
    let transition = net.transition(t);

    assert!(!transition.is_enabled(&Marking::from(vec![1u64, 0])));
    assert!(transition.is_enabled(&Marking::from(vec![2u64, 0])));
    assert!(transition.is_enabled(&Marking::from(vec![OMEGA, fin(0)])));

    assert_eq!(
        transition.fire(&Marking::from(vec![5u64, 1])).unwrap(),
        Marking::from(vec![3u64, 4])
    );
    assert_eq!(
        transition.fire(&Marking::from(vec![OMEGA, fin(1)])).unwrap(),
        Marking::from(vec![OMEGA, fin(4)])
    );
    assert_eq!(transition.get_update_for_place(PlaceIndex::new(0)), (2, 0));
}

#[test]
fn enabled_transitions_keep_declaration_order() {
    let mut net = PetriNet::new(vec!["P0".to_string()]);
    net.add_transition("c", vec![(1, PlaceIndex::new(0))], vec![]);
    net.add_transition("a", vec![(5, PlaceIndex::new(0))], vec![]);
    net.add_transition("b", vec![], vec![(1, PlaceIndex::new(0))]);

    let marking = Marking::from(vec![1u64]);
    let enabled = net
        .enabled_transitions(&marking)
        .map(|(_, t)| t.name())
        .collect::<Vec<_>>();
    assert_eq!(enabled, vec!["c", "b"]);
}

#[test]
fn firing_past_the_largest_count_fails() {
    let mut net = PetriNet::new(vec!["P0".to_string(), "P1".to_string()]);
    let t = net.add_transition(
        "push",
        vec![(1, PlaceIndex::new(1))],
        vec![(1, PlaceIndex::new(0))],
    );
    let transition = net.transition(t);

    let full = Marking::from(vec![u64::MAX, 1]);
    assert!(transition.is_enabled(&full));
    assert!(matches!(
        transition.fire(&full),
        Err(CoverabilityError::CountOverflow { .. })
    ));

    // ω absorbs the extra token instead
    assert_eq!(
        transition.fire(&Marking::from(vec![OMEGA, fin(1)])).unwrap(),
        Marking::from(vec![OMEGA, fin(0)])
    );
}

#[test]
fn place_index_conversion_is_checked() {
    assert_eq!(PlaceIndex::try_from(3usize).unwrap(), PlaceIndex::new(3));
    assert_eq!(
        PlaceIndex::try_from(u32::MAX as usize).unwrap(),
        PlaceIndex::new(u32::MAX)
    );

    #[cfg(target_pointer_width = "64")]
    assert!(matches!(
        PlaceIndex::try_from(u32::MAX as usize + 1),
        Err(CoverabilityError::InconsistentModel(_))
    ));
}
