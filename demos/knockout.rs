//! A four-team knockout: semi-finals, a final and a bronze match, with the
//! final placings read back through the group's standing.
//!
//! Run with `cargo run --example knockout`.

use vbcomp::*;

fn main() -> Result<()> {
    let competition_json = r#"{
        "name": "Harbour Cup",
        "teams": [
            { "id": "HAW", "name": "Hawks" },
            { "id": "OWL", "name": "Owls" },
            { "id": "KES", "name": "Kestrels" },
            { "id": "FAL", "name": "Falcons" }
        ],
        "stages": [{
            "id": "F",
            "name": "Finals",
            "groups": [{
                "id": "KO",
                "type": "knockout",
                "standing": ["{F:KO:FIN:winner}", "{F:KO:FIN:loser}", "{F:KO:BR:winner}", "{F:KO:BR:loser}"],
                "matches": [
                    { "type": "match", "id": "SF1", "homeTeam": "HAW", "awayTeam": "FAL" },
                    { "type": "match", "id": "SF2", "homeTeam": "OWL", "awayTeam": "KES" },
                    { "type": "break", "name": "Lunch", "start": "12:30", "duration": "1:00" },
                    {
                        "type": "match", "id": "BR",
                        "homeTeam": "{F:KO:SF1:loser}", "awayTeam": "{F:KO:SF2:loser}",
                        "officials": { "team": "{F:KO:SF1:winner}" }
                    },
                    {
                        "type": "match", "id": "FIN",
                        "homeTeam": "{F:KO:SF1:winner}", "awayTeam": "{F:KO:SF2:winner}",
                        "officials": { "team": "{F:KO:BR:loser}" }
                    }
                ]
            }]
        }]
    }"#;

    let mut competition = Competition::from_json_str(competition_json)?;
    let (stage, group) = (Id::new("F")?, Id::new("KO")?);

    let results: [(&str, &[SetScore]); 4] = [
        ("SF1", &[(25, 21), (23, 25), (25, 19), (25, 22)]),
        ("SF2", &[(19, 25), (25, 22), (22, 25), (25, 20), (12, 15)]),
        ("BR", &[(25, 16), (25, 18), (25, 23)]),
        ("FIN", &[(25, 23), (21, 25), (25, 27), (25, 20), (15, 11)]),
    ];

    for (match_id, scores) in results {
        let match_id = Id::new(match_id)?;
        let (home, away) = {
            let m = competition.get_match(&stage, &group, &match_id)?;
            (
                competition.resolve_slot(m.home())?,
                competition.resolve_slot(m.away())?,
            )
        };
        competition.record_score(&stage, &group, &match_id, scores)?;
        let winner = competition
            .get_match(&stage, &group, &match_id)?
            .winner_team_id(&competition)?;
        println!("{}: {} v {} -> {} wins", match_id, home, away, winner);
    }

    println!();
    println!("Final placings in {}:", competition.name);
    for position in 1..=4 {
        let team = competition.get_team(&format!("{{F:KO:{}}}", position))?;
        println!("  {}. {}", position, team.name);
    }
    Ok(())
}
