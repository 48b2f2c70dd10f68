use serde_json::{json, Value};
use vbcomp::*;

fn id(s: &str) -> Id {
    Id::new(s).unwrap()
}

fn load(doc: &Value) -> Result<Competition> {
    Competition::from_json_str(&doc.to_string())
}

fn scored(m: &str, home: &str, away: &str, h: &[i32], a: &[i32]) -> Value {
    json!({ "type": "match", "id": m, "homeTeam": home, "awayTeam": away, "scores": { "home": h, "away": a } })
}

fn pending(m: &str, home: &str, away: &str) -> Value {
    json!({ "type": "match", "id": m, "homeTeam": home, "awayTeam": away })
}

/// A four-team pool, a crossover seeded from the pool table and a knockout
/// final with a placing standing. The pool finishes TM2, TM1, TM3, TM4.
fn tournament() -> Value {
    json!({
        "name": "Spring Tournament",
        "clubs": [{ "id": "NOR", "name": "Northern" }, { "id": "SOU", "name": "Southern" }],
        "teams": [
            { "id": "TM1", "name": "Alpha", "club": "NOR" },
            { "id": "TM2", "name": "Bravo", "club": "NOR" },
            { "id": "TM3", "name": "Charlie", "club": "SOU" },
            { "id": "TM4", "name": "Delta" }
        ],
        "players": [
            { "id": "PL1", "name": "Alex", "number": 7, "teams": [{ "id": "TM1", "from": "2024-01-01", "until": "2024-06-30" }] }
        ],
        "stages": [
            {
                "id": "L",
                "name": "Pools",
                "groups": [{
                    "id": "P1",
                    "type": "league",
                    "matches": [
                        scored("M1", "TM1", "TM2", &[25, 20, 18, 22], &[20, 25, 25, 25]),
                        scored("M2", "TM3", "TM4", &[25, 25, 25], &[15, 17, 19]),
                        scored("M3", "TM1", "TM3", &[25, 25, 25], &[21, 22, 23]),
                        { "type": "break", "name": "Lunch", "start": "12:00", "duration": "0:45" },
                        scored("M4", "TM2", "TM4", &[25, 25, 25], &[10, 12, 14]),
                        scored("M5", "TM1", "TM4", &[25, 25, 25], &[19, 19, 19]),
                        scored("M6", "TM2", "TM3", &[25, 25, 23, 25], &[20, 22, 25, 21])
                    ]
                }]
            },
            {
                "id": "C",
                "groups": [{
                    "id": "CO",
                    "type": "crossover",
                    "matches": [
                        {
                            "type": "match", "id": "CO1",
                            "homeTeam": "{L:P1:league:1}", "awayTeam": "{L:P1:league:4}",
                            "officials": { "team": "{L:P1:M6:loser}" },
                            "manager": { "name": "Morgan Manager" }
                        },
                        pending("CO2", "{L:P1:league:2}", "{L:P1:league:3}")
                    ]
                }]
            },
            {
                "id": "F",
                "groups": [{
                    "id": "KO",
                    "type": "knockout",
                    "standing": ["{F:KO:FIN:winner}", "{F:KO:FIN:loser}", "{F:KO:BR:winner}", "{F:KO:BR:loser}"],
                    "matches": [
                        pending("FIN", "{C:CO:CO1:winner}", "{C:CO:CO2:winner}"),
                        pending("BR", "{C:CO:CO1:loser}", "{C:CO:CO2:loser}")
                    ]
                }]
            }
        ]
    })
}

const HOME_WIN: [SetScore; 3] = [(25, 20), (25, 20), (25, 20)];
const AWAY_WIN: [SetScore; 3] = [(20, 25), (20, 25), (20, 25)];

fn team_ids(competition: &Competition, exprs: &[&str]) -> Vec<String> {
    exprs
        .iter()
        .map(|e| competition.get_team_id(e).unwrap().to_string())
        .collect()
}

#[test]
fn test_pool_standings() {
    let competition = load(&tournament()).unwrap();
    let pool = competition.get_group(&id("L"), &id("P1")).unwrap();
    assert!(pool.is_complete());

    let table = pool.standings(&competition).unwrap();
    let order: Vec<&str> = table.iter().map(|row| row.team.as_str()).collect();
    assert_eq!(order, vec!["TM2", "TM1", "TM3", "TM4"]);
    assert_eq!(table[0].wins, 3);
    assert_eq!(table[0].league_points, 9);
    assert_eq!(table[3].losses, 3);
    assert_eq!(table[1].sets_for, 7);
    assert_eq!(table[1].sets_against, 3);
}

#[test]
fn test_full_tournament_resolution() {
    let mut competition = load(&tournament()).unwrap();
    let (c, co, f, ko) = (id("C"), id("CO"), id("F"), id("KO"));

    assert_eq!(
        team_ids(&competition, &["{L:P1:league:1}", "{L:P1:league:2}", "{L:P1:3}", "{L:P1:4}"]),
        vec!["TM2", "TM1", "TM3", "TM4"]
    );

    let err = competition.get_team_id("{C:CO:CO1:winner}").unwrap_err();
    assert!(matches!(err, CompetitionError::NotDecidedYet(_)));
    let err = competition.get_team_id("{F:KO:1}").unwrap_err();
    assert!(matches!(err, CompetitionError::NotDecidedYet(_)));

    competition.record_score(&c, &co, &id("CO1"), &HOME_WIN).unwrap();
    competition.record_score(&c, &co, &id("CO2"), &AWAY_WIN).unwrap();
    assert_eq!(
        team_ids(&competition, &["{C:CO:1}", "{C:CO:2}", "{C:CO:3}", "{C:CO:4}"]),
        vec!["TM2", "TM4", "TM3", "TM1"]
    );

    competition.record_score(&f, &ko, &id("FIN"), &AWAY_WIN).unwrap();
    competition.record_score(&f, &ko, &id("BR"), &HOME_WIN).unwrap();
    assert_eq!(
        team_ids(&competition, &["{F:KO:1}", "{F:KO:2}", "{F:KO:3}", "{F:KO:4}"]),
        vec!["TM3", "TM2", "TM4", "TM1"]
    );
    assert_eq!(competition.get_team("{F:KO:1}").unwrap().name, "Charlie");
    assert!(competition.is_complete());

    let err = competition.get_team_id("{F:KO:5}").unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn test_winner_and_loser_are_the_match_teams() {
    let mut competition = load(&tournament()).unwrap();
    competition
        .record_score(&id("C"), &id("CO"), &id("CO1"), &[(25, 23), (23, 25), (25, 20), (21, 25), (15, 13)])
        .unwrap();

    let winner = competition.get_team_id("{C:CO:CO1:winner}").unwrap();
    let loser = competition.get_team_id("{C:CO:CO1:loser}").unwrap();
    assert_ne!(winner, loser);
    assert_eq!(winner, id("TM2"));
    assert_eq!(loser, id("TM4"));

    let m = competition.get_match(&id("C"), &id("CO"), &id("CO1")).unwrap();
    assert_eq!(m.winner_team_id(&competition).unwrap(), winner);
    assert_eq!(m.loser_team_id(&competition).unwrap(), loser);
}

#[test]
fn test_resolution_is_idempotent() {
    let mut competition = load(&tournament()).unwrap();
    competition.record_score(&id("C"), &id("CO"), &id("CO1"), &HOME_WIN).unwrap();

    let before = competition.get_team_id("{C:CO:CO1:winner}").unwrap();
    assert_eq!(competition.get_team_id("{C:CO:CO1:winner}").unwrap(), before);

    competition.record_score(&id("C"), &id("CO"), &id("CO2"), &HOME_WIN).unwrap();
    assert_eq!(competition.get_team_id("{C:CO:CO1:winner}").unwrap(), before);
}

#[test]
fn test_pending_match_has_no_winner() {
    let competition = load(&tournament()).unwrap();
    let m = competition.get_match(&id("C"), &id("CO"), &id("CO2")).unwrap();
    let err = m.winner_team_id(&competition).unwrap_err();
    assert!(matches!(err, CompetitionError::NotComplete(_)));
}

#[test]
fn test_duplicate_club_rejected_wherever_it_appears() {
    for clubs in [
        json!([{ "id": "NOR", "name": "A" }, { "id": "NOR", "name": "B" }]),
        json!([{ "id": "NOR", "name": "A" }, { "id": "SOU", "name": "B" }, { "id": "NOR", "name": "C" }]),
    ] {
        let mut doc = tournament();
        doc["clubs"] = clubs;
        let err = load(&doc).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("\"NOR\""), "{}", message);
        assert!(message.contains("already exists"), "{}", message);
    }
}

#[test]
fn test_duplicate_match_in_group_rejected() {
    let mut doc = tournament();
    doc["stages"][2]["groups"][0]["matches"][1]["id"] = json!("FIN");
    let err = load(&doc).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Match with ID \"FIN\" already exists in the group"
    );
}

#[test]
fn test_league_draw_depends_on_group_setting() {
    let doc = |draws_allowed: bool| {
        json!({
            "name": "Draws",
            "teams": [{ "id": "TM1", "name": "Alpha" }, { "id": "TM2", "name": "Bravo" }],
            "stages": [{ "id": "L", "groups": [{
                "id": "RR", "type": "league", "drawsAllowed": draws_allowed,
                "sets": { "maxSets": 2, "setsToWin": 2, "lastSetPointsToWin": 25 },
                "matches": [scored("RR1", "TM1", "TM2", &[25, 20], &[20, 25])]
            }]}]
        })
    };

    let err = load(&doc(false)).unwrap_err();
    assert!(matches!(err, CompetitionError::InvalidScore { .. }));
    assert!(err.to_string().contains("RR1"));
    assert!(err.to_string().contains("draws are not allowed"));

    let competition = load(&doc(true)).unwrap();
    let table = competition
        .get_group(&id("L"), &id("RR"))
        .unwrap()
        .standings(&competition)
        .unwrap();
    assert!(table.iter().all(|row| row.draws == 1 && row.league_points == 1));
    let m = competition.get_match(&id("L"), &id("RR"), &id("RR1")).unwrap();
    assert!(m.outcome().unwrap().is_draw());
    assert!(m.winner_side().is_err());
}

#[test]
fn test_best_of_three_decided_in_two_sets() {
    let mut competition = Competition::from_json_str(
        &json!({
            "name": "Short",
            "teams": [{ "id": "TM1", "name": "Alpha" }, { "id": "TM2", "name": "Bravo" }],
            "stages": [{ "id": "C", "groups": [{
                "id": "CO", "type": "crossover",
                "sets": { "maxSets": 3, "setsToWin": 2 },
                "matches": [pending("CO1", "TM1", "TM2")]
            }]}]
        })
        .to_string(),
    )
    .unwrap();

    let (c, co, m) = (id("C"), id("CO"), id("CO1"));
    let err = competition
        .record_score(&c, &co, &m, &[(25, 20), (25, 18), (25, 10)])
        .unwrap_err();
    assert!(matches!(err, CompetitionError::InvalidScore { .. }));
    assert!(!competition.get_match(&c, &co, &m).unwrap().is_complete());

    let outcome = competition.record_score(&c, &co, &m, &[(25, 20), (25, 18)]).unwrap();
    assert_eq!(outcome.winner(), Some(Side::Home));
    assert_eq!(competition.get_team_id("{C:CO:CO1:winner}").unwrap(), id("TM1"));
}

#[test]
fn test_continuous_match() {
    let competition = load(&json!({
        "name": "Beach",
        "teams": [{ "id": "TM1", "name": "Alpha" }, { "id": "TM2", "name": "Bravo" }],
        "stages": [{ "id": "C", "groups": [{
            "id": "CO", "type": "crossover", "matchType": "continuous",
            "matches": [scored("CO1", "TM1", "TM2", &[38], &[41])]
        }]}]
    }))
    .unwrap();
    assert_eq!(competition.get_team_id("{C:CO:CO1:winner}").unwrap(), id("TM2"));
}

#[test]
fn test_officials_switch_modes() {
    let mut competition = load(&tournament()).unwrap();
    let m = competition
        .get_match_mut(&id("C"), &id("CO"), &id("CO1"))
        .unwrap();
    assert_eq!(m.manager().unwrap().manager_name(), Some("Morgan Manager"));

    let officials = m.officials_mut().unwrap();
    assert!(officials.is_team());
    assert_eq!(officials.first_ref(), None);
    assert!(officials.set_second_ref("Sam Second").is_err());

    officials.set_first_ref("Fran First").unwrap();
    officials.set_second_ref("Sam Second").unwrap();
    officials.set_scorer("Sky Scorer").unwrap();
    assert!(!officials.is_team());
    assert!(officials.has_second_ref());

    officials.set_team(TeamSlot::parse("{L:P1:M6:loser}").unwrap());
    assert!(officials.is_team());
    assert!(!officials.has_first_ref());
    assert!(!officials.has_second_ref());
    assert!(!officials.has_scorer());
    assert_eq!(officials.first_ref(), None);

    let slot = competition
        .get_match(&id("C"), &id("CO"), &id("CO1"))
        .unwrap()
        .officials()
        .and_then(MatchOfficials::team_slot)
        .cloned()
        .unwrap();
    assert_eq!(competition.resolve_slot(&slot).unwrap(), id("TM3"));
}

#[test]
fn test_player_affiliation_dates() {
    let mut competition = load(&tournament()).unwrap();
    assert_eq!(competition.team_players(&id("TM1")).unwrap().len(), 1);

    let player = competition.get_player_by_id_mut(&id("PL1")).unwrap();
    assert_eq!(player.number, Some(7));
    let entry = &mut player.teams_mut()[0];
    entry.set_from("2024-02-01").unwrap();
    entry.set_until("2024-12-31").unwrap();
    assert!(entry.set_until("2024-13-01").is_err());
    assert!(entry.set_from("2023-02-29").is_err());

    let entry = &competition.player_teams(&id("PL1")).unwrap()[0];
    assert_eq!(entry.from().unwrap().to_string(), "2024-02-01");
    assert_eq!(entry.until().unwrap().to_string(), "2024-12-31");
}

#[test]
fn test_club_registry() {
    let competition = load(&tournament()).unwrap();
    let northern: Vec<&str> = competition
        .club_teams(&id("NOR"))
        .unwrap()
        .iter()
        .map(|t| t.id().as_str())
        .collect();
    assert_eq!(northern, vec!["TM1", "TM2"]);
    assert!(competition.team_club(&id("TM4")).unwrap().is_none());
    assert!(competition.get_club_by_id(&id("XXX")).unwrap_err().is_not_found());
    assert_eq!(competition.clubs().len(), 2);
}

#[test]
fn test_malformed_reference_rejects_document() {
    let mut doc = tournament();
    doc["stages"][2]["groups"][0]["matches"][0]["awayTeam"] = json!("{C:CO:CO2:winner");
    let err = load(&doc).unwrap_err();
    assert!(matches!(err, CompetitionError::MalformedReference { .. }));
    assert!(err.to_string().contains("match \"FIN\""));
}

#[test]
fn test_reference_to_unknown_match_rejects_document() {
    let mut doc = tournament();
    doc["stages"][2]["groups"][0]["matches"][0]["awayTeam"] = json!("{C:CO:CO9:winner}");
    let err = load(&doc).unwrap_err();
    assert!(matches!(err, CompetitionError::UnknownMatch { .. }));
}

#[test]
fn test_forward_reference_rejects_document() {
    let mut doc = tournament();
    doc["stages"][1]["groups"][0]["matches"][1]["awayTeam"] = json!("{F:KO:FIN:winner}");
    let err = load(&doc).unwrap_err();
    assert!(matches!(err, CompetitionError::UnknownStage(_)));

    let mut doc = tournament();
    doc["stages"][2]["groups"][0]["matches"][0]["homeTeam"] = json!("{F:KO:BR:winner}");
    let err = load(&doc).unwrap_err();
    assert!(matches!(err, CompetitionError::Validation(_)));
}

#[test]
fn test_breaks_are_kept_in_order() {
    let competition = load(&tournament()).unwrap();
    let pool = competition.get_group(&id("L"), &id("P1")).unwrap();
    assert_eq!(pool.entries().len(), 7);
    match &pool.entries()[3] {
        GroupEntry::Break(b) => {
            assert_eq!(b.name.as_deref(), Some("Lunch"));
            assert_eq!(b.schedule.duration_minutes(), Some(45));
        }
        other => panic!("expected a break, got {:?}", other),
    }
}

#[test]
fn test_oversized_break_duration_rejects_document() {
    let mut doc = tournament();
    doc["stages"][0]["groups"][0]["matches"][3]["duration"] = json!("99999999:00");
    let err = load(&doc).unwrap_err();
    assert!(matches!(err, CompetitionError::Validation(_)));
    assert!(err.to_string().contains("99999999:00"));
}
