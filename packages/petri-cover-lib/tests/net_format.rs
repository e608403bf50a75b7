use petri_cover_lib::{
    automaton::{
        marking::{Marking, PlaceIndex},
        omega::ExtendedValue,
        petri_net::{PetriNet, format::ToTextFormat, initialized::InitializedPetriNet},
    },
    error::CoverabilityError,
};

const PRODUCER_CONSUMER: &str = r#"
    places: idle, ready, buffer
    marking: 1, 0, ω
    transitions:
        produce: idle=1 -> ready=1,
        deliver: ready=1 -> idle=1;buffer=2,
        consume: buffer=3 ->
"#;

#[test]
fn parse_text_net() {
    let net = InitializedPetriNet::parse_from_text(PRODUCER_CONSUMER).unwrap();

    assert_eq!(net.place_count(), 3);
    assert_eq!(net.net.places(), &["idle", "ready", "buffer"]);
    assert_eq!(net.net.place_index("buffer"), Some(PlaceIndex::new(2)));
    assert_eq!(net.net.place_index("missing"), None);
    assert_eq!(
        net.initial_marking,
        Marking::from(vec![
            ExtendedValue::Finite(1),
            ExtendedValue::Finite(0),
            ExtendedValue::Omega
        ])
    );

    let deliver = net.net.transition(1);
    assert_eq!(deliver.name(), "deliver");
    assert_eq!(deliver.input(), &[(1u64, PlaceIndex::new(1))]);
    assert_eq!(
        deliver.output(),
        &[(1u64, PlaceIndex::new(0)), (2u64, PlaceIndex::new(2))]
    );

    let consume = net.net.transition(2);
    assert!(consume.output().is_empty());
}

#[test]
fn text_format_can_be_parsed_again() {
    let net = InitializedPetriNet::parse_from_text(PRODUCER_CONSUMER).unwrap();
    let text = net.to_text_format();
    let reparsed = InitializedPetriNet::parse_from_text(&text).unwrap();

    assert_eq!(net, reparsed);
}

#[test]
fn omega_spellings_are_equivalent() {
    let a = InitializedPetriNet::parse_from_text("places: P\nmarking: ω\ntransitions:").unwrap();
    let b = InitializedPetriNet::parse_from_text("places: P\nmarking: omega\ntransitions:").unwrap();
    let c = InitializedPetriNet::parse_from_text("places: P\nmarking: w\ntransitions:").unwrap();

    assert_eq!(a, b);
    assert_eq!(b, c);
}

#[test]
fn json_net_is_validated() {
    let net = InitializedPetriNet::parse_from_text(PRODUCER_CONSUMER).unwrap();
    let json = net.to_json().unwrap();
    assert!(json.contains("\"ω\""));
    assert_eq!(InitializedPetriNet::from_json(&json).unwrap(), net);

    let broken = r#"{
        "net": {
            "places": ["P0", "P1"],
            "transitions": [{ "name": "t", "input": [[1, 5]], "output": [] }]
        },
        "initial_marking": [1, 0]
    }"#;
    assert!(InitializedPetriNet::from_json(broken).is_err());

    let short = r#"{
        "net": { "places": ["P0", "P1"], "transitions": [] },
        "initial_marking": [1]
    }"#;
    assert!(InitializedPetriNet::from_json(short).is_err());
}

#[test]
fn unknown_place_in_arc_is_rejected() {
    let res = InitializedPetriNet::parse_from_text(
        "places: P0\nmarking: 1\ntransitions: t1: P0=1 -> P7=1",
    );
    assert!(matches!(res, Err(CoverabilityError::InconsistentModel(_))));
}

#[test]
fn marking_length_must_match_places() {
    let res = InitializedPetriNet::parse_from_text("places: P0, P1\nmarking: 1\ntransitions:");
    assert!(matches!(res, Err(CoverabilityError::InconsistentModel(_))));
}

#[test]
fn duplicate_names_are_rejected() {
    let places = InitializedPetriNet::parse_from_text("places: P0, P0\nmarking: 1, 1\ntransitions:");
    assert!(matches!(places, Err(CoverabilityError::InconsistentModel(_))));

    let transitions = InitializedPetriNet::parse_from_text(
        "places: P0\nmarking: 1\ntransitions: t: P0=1 -> P0=1, t: P0=1 ->",
    );
    assert!(matches!(
        transitions,
        Err(CoverabilityError::InconsistentModel(_))
    ));
}

#[test]
fn duplicate_arc_place_is_rejected() {
    let mut net = PetriNet::new(vec!["P0".to_string()]);
    net.add_transition(
        "twice",
        vec![(1, PlaceIndex::new(0)), (2, PlaceIndex::new(0))],
        vec![],
    );

    assert!(matches!(
        net.init(Marking::from(vec![3u64])),
        Err(CoverabilityError::InconsistentModel(_))
    ));
}

#[test]
fn malformed_text_is_a_parse_error() {
    let res = InitializedPetriNet::parse_from_text("places P0\nmarking: 1\ntransitions:");
    assert!(matches!(res, Err(CoverabilityError::Parse(_))));

    let res = InitializedPetriNet::parse_from_text("places: P0\nmarking: -1\ntransitions:");
    assert!(matches!(res, Err(CoverabilityError::Parse(_))));
}

#[test]
fn unsupported_extension_is_rejected() {
    assert!(InitializedPetriNet::from_file("net.xml").is_err());
}

#[test]
fn files_are_loaded_by_extension() {
    let net = InitializedPetriNet::parse_from_text(PRODUCER_CONSUMER).unwrap();
    let dir = std::env::temp_dir();
    let json_path = dir.join("petri_cover_net_format_test.json");
    let text_path = dir.join("petri_cover_net_format_test.pn");
    let json_path = json_path.to_str().unwrap();
    let text_path = text_path.to_str().unwrap();

    net.to_json_file(json_path).unwrap();
    net.to_text_file(text_path).unwrap();

    assert_eq!(InitializedPetriNet::from_file(json_path).unwrap(), net);
    assert_eq!(InitializedPetriNet::from_file(text_path).unwrap(), net);

    std::fs::remove_file(json_path).unwrap();
    std::fs::remove_file(text_path).unwrap();
}
