/// In this file, we parse the compact textual description of a Petri net.
///
/// A description consists of three labelled sections: the places, the
/// initial marking, and the transitions.
///
/// ```text
/// places: P0, P1, P2
/// marking: 1, 0, 0
/// transitions:
///     t1: P0=1 -> P1=1,
///     t2: P1=1 -> P2=1,
///     t3: P2=1 -> P0=1
/// ```
///
/// The marking lists one token count per place, in place order. `ω`, `w`
/// and `omega` stand for an unbounded count.
///
/// A transition is `name: pre -> post`, where `pre` and `post` are
/// `;`-separated lists of `Place=weight` arcs. Either list may be empty.
/// Places that are not mentioned are neither consumed from nor produced
/// into.
use itertools::Itertools;
use nom::{
    Parser,
    bytes::complete::{tag, take_while1},
    error::ParseError,
};

use crate::{
    automaton::{
        marking::PlaceIndex,
        omega::{ExtendedValue, OMEGA_SPELLINGS},
        petri_net::{initialized::InitializedPetriNet, transition::PetriNetTransition},
    },
    error::{CoverabilityError, CoverabilityResult},
};

fn count<'a, E: ParseError<&'a str>>(input: &'a str) -> nom::IResult<&'a str, u64, E> {
    let (rest, digits) = nom::character::complete::digit1(input)?;
    match digits.parse::<u64>() {
        Ok(n) => Ok((rest, n)),
        // only reachable on overflow
        Err(_) => Err(nom::Err::Error(E::from_error_kind(
            input,
            nom::error::ErrorKind::Digit,
        ))),
    }
}

fn omega<'a, E: ParseError<&'a str>>(input: &'a str) -> nom::IResult<&'a str, ExtendedValue, E> {
    for spelling in OMEGA_SPELLINGS {
        if let Ok((rest, _)) = tag::<_, _, E>(spelling)(input) {
            return Ok((rest, ExtendedValue::Omega));
        }
    }
    Err(nom::Err::Error(E::from_error_kind(
        input,
        nom::error::ErrorKind::Tag,
    )))
}

fn extended_value<'a, E: ParseError<&'a str>>(
    input: &'a str,
) -> nom::IResult<&'a str, ExtendedValue, E> {
    nom::branch::alt((omega, nom::combinator::map(count, ExtendedValue::Finite))).parse(input)
}

fn opt_whitespace<'a, E: ParseError<&'a str>>(input: &'a str) -> nom::IResult<&'a str, &'a str, E> {
    nom::character::complete::multispace0(input)
}

fn separator<'a, E: ParseError<&'a str>>(
    sep: &'static str,
) -> impl Fn(&'a str) -> nom::IResult<&'a str, (), E> {
    move |input| {
        let (input, _) = opt_whitespace(input)?;
        let (input, _) = tag(sep)(input)?;
        let (input, _) = opt_whitespace(input)?;
        Ok((input, ()))
    }
}

fn identifier<'a, E: ParseError<&'a str>>(input: &'a str) -> nom::IResult<&'a str, &'a str, E> {
    take_while1(|c: char| c.is_alphanumeric() || c == '_')(input)
}

fn section_header<'a, E: ParseError<&'a str>>(
    name: &'static str,
) -> impl Fn(&'a str) -> nom::IResult<&'a str, (), E> {
    move |input| {
        let (input, _) = opt_whitespace(input)?;
        let (input, _) = tag(name)(input)?;
        let (input, _) = opt_whitespace(input)?;
        let (input, _) = tag(":")(input)?;
        let (input, _) = opt_whitespace(input)?;
        Ok((input, ()))
    }
}

#[test]
fn test_extended_value() {
    let (_, v) = extended_value::<nom::error::Error<&str>>("12").unwrap();
    assert_eq!(v, ExtendedValue::Finite(12));
    let (_, v) = extended_value::<nom::error::Error<&str>>("ω").unwrap();
    assert_eq!(v, ExtendedValue::Omega);
    for spelling in OMEGA_SPELLINGS {
        let (rest, v) = extended_value::<nom::error::Error<&str>>(spelling).unwrap();
        assert_eq!(v, ExtendedValue::Omega);
        assert!(rest.is_empty());
    }
    assert!(extended_value::<nom::error::Error<&str>>("Omega").is_err());
    assert!(extended_value::<nom::error::Error<&str>>("-1").is_err());
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arc<'a> {
    pub place: &'a str,
    pub weight: u64,
}

fn arc<'a, E: ParseError<&'a str>>(input: &'a str) -> nom::IResult<&'a str, Arc<'a>, E> {
    let (input, place) = identifier(input)?;
    let (input, _) = opt_whitespace(input)?;
    let (input, _) = tag("=")(input)?;
    let (input, _) = opt_whitespace(input)?;
    let (input, weight) = count(input)?;

    Ok((input, Arc { place, weight }))
}

fn arcs<'a, E: ParseError<&'a str>>(input: &'a str) -> nom::IResult<&'a str, Vec<Arc<'a>>, E> {
    nom::multi::separated_list0(separator(";"), arc).parse(input)
}

#[test]
fn test_arcs_1() {
    let (_, arcs) = arcs::<nom::error::Error<&str>>("P0=1; P1 = 2").unwrap();
    assert_eq!(
        arcs,
        vec![
            Arc {
                place: "P0",
                weight: 1
            },
            Arc {
                place: "P1",
                weight: 2
            }
        ]
    );
}

#[test]
fn test_arcs_empty() {
    let (rest, arcs) = arcs::<nom::error::Error<&str>>(", t2").unwrap();
    assert!(arcs.is_empty());
    assert_eq!(rest, ", t2");
}

#[derive(Debug, Clone)]
pub struct TransitionDescription<'a> {
    pub name: &'a str,
    pub pre: Vec<Arc<'a>>,
    pub post: Vec<Arc<'a>>,
}

impl<'a> TransitionDescription<'a> {
    pub fn to_transition(&self, places: &[&'a str]) -> CoverabilityResult<PetriNetTransition> {
        let resolve = |arcs: &[Arc<'a>]| -> CoverabilityResult<Vec<(u64, PlaceIndex)>> {
            arcs.iter()
                .map(|arc| match places.iter().position(|&p| p == arc.place) {
                    Some(pos) => Ok((arc.weight, PlaceIndex::try_from(pos)?)),
                    None => Err(CoverabilityError::inconsistent(format!(
                        "Place '{}' in transition '{}' not found in place list.",
                        arc.place, self.name
                    ))),
                })
                .collect()
        };

        Ok(PetriNetTransition::new(
            self.name,
            resolve(&self.pre)?,
            resolve(&self.post)?,
        ))
    }
}

fn transition<'a, E: ParseError<&'a str>>(
    input: &'a str,
) -> nom::IResult<&'a str, TransitionDescription<'a>, E> {
    let (input, name) = identifier(input)?;
    let (input, _) = opt_whitespace(input)?;
    let (input, _) = tag(":")(input)?;
    let (input, _) = opt_whitespace(input)?;
    let (input, pre) = arcs(input)?;
    let (input, _) = opt_whitespace(input)?;
    let (input, _) = tag("->")(input)?;
    let (input, _) = opt_whitespace(input)?;
    let (input, post) = arcs(input)?;

    Ok((input, TransitionDescription { name, pre, post }))
}

#[test]
fn test_transition_1() {
    let (_, t) = transition::<nom::error::Error<&str>>("t1: P0=1;P1=2->P2=1").unwrap();
    assert_eq!(t.name, "t1");
    assert_eq!(t.pre.len(), 2);
    assert_eq!(t.post.len(), 1);
    assert_eq!(t.post[0].place, "P2");
}

#[test]
fn test_transition_2() {
    let (_, t) = transition::<nom::error::Error<&str>>("sink : P0 = 3 -> ").unwrap();
    assert_eq!(t.name, "sink");
    assert_eq!(t.pre[0].weight, 3);
    assert!(t.post.is_empty());
}

fn places<'a, E: ParseError<&'a str>>(input: &'a str) -> nom::IResult<&'a str, Vec<&'a str>, E> {
    let (input, _) = section_header("places")(input)?;
    nom::multi::separated_list1(separator(","), identifier).parse(input)
}

fn marking<'a, E: ParseError<&'a str>>(
    input: &'a str,
) -> nom::IResult<&'a str, Vec<ExtendedValue>, E> {
    let (input, _) = section_header("marking")(input)?;
    nom::multi::separated_list1(separator(","), extended_value).parse(input)
}

fn transitions<'a, E: ParseError<&'a str>>(
    input: &'a str,
) -> nom::IResult<&'a str, Vec<TransitionDescription<'a>>, E> {
    let (input, _) = section_header("transitions")(input)?;
    nom::multi::separated_list0(separator(","), transition).parse(input)
}

#[test]
fn test_places_1() {
    let input = r#"
    places: P0, P1,
        P2
    "#;
    let (_, places) = places::<nom::error::Error<&str>>(input).unwrap();
    assert_eq!(places, vec!["P0", "P1", "P2"]);
}

#[test]
fn test_marking_1() {
    let (_, marking) = marking::<nom::error::Error<&str>>("marking: 1, ω, 0").unwrap();
    assert_eq!(
        marking,
        vec![
            ExtendedValue::Finite(1),
            ExtendedValue::Omega,
            ExtendedValue::Finite(0)
        ]
    );
}

#[test]
fn test_transitions_1() {
    let input = r#"transitions:
        t1: P0=1 -> P1=1,
        t2: P1=1 -> P2=1"#;
    let (_, transitions) = transitions::<nom::error::Error<&str>>(input).unwrap();
    assert_eq!(transitions.len(), 2);
    assert_eq!(transitions[1].name, "t2");
}

#[derive(Debug, Clone)]
pub struct NetDescription<'a> {
    pub places: Vec<&'a str>,
    pub marking: Vec<ExtendedValue>,
    pub transitions: Vec<TransitionDescription<'a>>,
}

impl<'a> NetDescription<'a> {
    fn p(input: &'a str) -> nom::IResult<&'a str, NetDescription<'a>, nom::error::Error<&'a str>> {
        let (input, places) = places(input)?;
        let (input, marking) = marking(input)?;
        let (input, transitions) = transitions(input)?;
        let (input, _) = opt_whitespace(input)?;

        Ok((
            input,
            NetDescription {
                places,
                marking,
                transitions,
            },
        ))
    }

    pub fn parse(input: &'a str) -> CoverabilityResult<NetDescription<'a>> {
        match Self::p(input) {
            Ok(("", description)) => Ok(description),
            Ok((rest, _)) => Err(CoverabilityError::Parse(format!(
                "unexpected input near '{}'",
                rest.chars().take(20).collect::<String>()
            ))),
            Err(e) => Err(CoverabilityError::Parse(e.to_string())),
        }
    }
}

#[test]
fn test_description_1() {
    let input = r#"
    places: P0, P1, P2
    marking: 1, 0, 0
    transitions: t1: P0=1 -> P1=1, t2: P1=1 -> P2=1, t3: P2=1 -> P0=1
    "#;
    let description = NetDescription::parse(input).unwrap();
    assert_eq!(description.places, vec!["P0", "P1", "P2"]);
    assert_eq!(description.marking.len(), 3);
    assert_eq!(description.transitions.len(), 3);
}

#[test]
fn test_description_trailing_garbage() {
    let input = "places: P0\nmarking: 1\ntransitions: t1: P0=1 -> P0=1 ???";
    assert!(matches!(
        NetDescription::parse(input),
        Err(CoverabilityError::Parse(_))
    ));
}

pub trait ToTextFormat {
    fn to_text_format(&self) -> String;
}

impl ToTextFormat for InitializedPetriNet {
    fn to_text_format(&self) -> String {
        let net = &self.net;
        let mut text = String::new();

        text.push_str("places: ");
        text.push_str(&net.places().join(", "));
        text.push('\n');

        text.push_str("marking: ");
        text.push_str(&self.initial_marking.iter().join(", "));
        text.push('\n');

        let format_arcs = |arcs: &[(u64, PlaceIndex)]| {
            arcs.iter()
                .map(|(weight, place)| format!("{}={}", net.place_name(*place), weight))
                .join(";")
        };

        text.push_str("transitions:");
        let rules = net
            .transitions()
            .iter()
            .map(|t| {
                format!(
                    "\n    {}: {} -> {}",
                    t.name(),
                    format_arcs(t.input()),
                    format_arcs(t.output())
                )
            })
            .join(",");
        text.push_str(&rules);
        text.push('\n');

        text
    }
}
