use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;

use switchyard_dns_domain::{Rule, RuleAction, RuleMatcher, RuleTable};

fn upstreams(addrs: &[&str]) -> Arc<[SocketAddr]> {
    addrs.iter().map(|a| a.parse().unwrap()).collect()
}

fn default_upstreams() -> Arc<[SocketAddr]> {
    upstreams(&["8.8.8.8:53", "8.8.4.4:53"])
}

#[test]
fn test_unmatched_name_falls_through_to_default() {
    let table = RuleTable::new(Vec::new(), default_upstreams());

    let decision = table.lookup("unrelated.example.org");
    assert_eq!(decision.answer, None);
    assert_eq!(decision.upstreams.as_ref(), default_upstreams().as_ref());
}

#[test]
fn test_exact_key_returns_static_answer() {
    let rules = vec![Rule::new(
        RuleMatcher::exact("printer.local"),
        RuleAction::StaticAnswer(Ipv4Addr::new(192, 168, 1, 50)),
    )];
    let table = RuleTable::new(rules, default_upstreams());

    let decision = table.lookup("printer.local");
    assert_eq!(decision.answer, Some(Ipv4Addr::new(192, 168, 1, 50)));
}

#[test]
fn test_regex_route_forwards_to_listed_upstreams() {
    let corp = upstreams(&["10.0.0.2:53"]);
    let rules = vec![Rule::new(
        RuleMatcher::compile(r".*\.corp\.example\.com").unwrap(),
        RuleAction::Forward(corp.clone()),
    )];
    let table = RuleTable::new(rules, default_upstreams());

    let decision = table.lookup("db.corp.example.com");
    assert_eq!(decision.answer, None);
    assert_eq!(decision.upstreams.as_ref(), corp.as_ref());
}

#[test]
fn test_first_matching_rule_wins() {
    let other = upstreams(&["10.0.0.9:53"]);
    let rules = vec![
        Rule::new(
            RuleMatcher::compile(r"service\.example\.com").unwrap(),
            RuleAction::StaticAnswer(Ipv4Addr::new(10, 1, 1, 1)),
        ),
        Rule::new(
            RuleMatcher::compile(r".*\.example\.com").unwrap(),
            RuleAction::Forward(other),
        ),
    ];
    let table = RuleTable::new(rules, default_upstreams());

    let decision = table.lookup("service.example.com");
    assert_eq!(decision.answer, Some(Ipv4Addr::new(10, 1, 1, 1)));
}

#[test]
fn test_trailing_dot_routes_like_relative_name() {
    let rules = vec![Rule::new(
        RuleMatcher::exact("printer.local"),
        RuleAction::StaticAnswer(Ipv4Addr::new(192, 168, 1, 50)),
    )];
    let table = RuleTable::new(rules, default_upstreams());

    let absolute = table.lookup("printer.local.");
    let relative = table.lookup("printer.local");
    assert_eq!(absolute.answer, relative.answer);
    assert_eq!(absolute.answer, Some(Ipv4Addr::new(192, 168, 1, 50)));
}

#[test]
fn test_unanchored_pattern_matches_inside_longer_name() {
    let matcher = RuleMatcher::compile(r".*google.com").unwrap();

    assert!(matcher.matches("www.google.com"));
    // An unanchored search also hits names that merely contain the pattern.
    assert!(matcher.matches("google.com.attacker.net"));
    assert!(!matcher.matches("example.org"));
}

#[test]
fn test_exact_matcher_ignores_regex_metacharacters() {
    let matcher = RuleMatcher::exact("printer.local (lab)");

    assert!(matcher.matches("printer.local (lab)"));
    assert!(!matcher.matches("printer.local"));
}

#[test]
fn test_static_match_keeps_default_upstreams() {
    let rules = vec![Rule::new(
        RuleMatcher::exact("printer.local"),
        RuleAction::StaticAnswer(Ipv4Addr::new(192, 168, 1, 50)),
    )];
    let table = RuleTable::new(rules, default_upstreams());

    let decision = table.lookup("printer.local");
    assert_eq!(decision.upstreams.as_ref(), default_upstreams().as_ref());
}
