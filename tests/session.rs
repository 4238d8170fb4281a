mod common;

use comp_tracker_lib::{ErrorKind, Response, Session};
use serde_json::{Value, json};

async fn send(session: &mut Session, command: Value) -> Response {
    session.handle_json(&command.to_string()).await
}

fn ok(response: Response) -> Value {
    match response {
        Response::Ok(value) => value,
        Response::Error(err) => panic!("unexpected error: {}", err),
    }
}

fn error_kind(response: Response) -> ErrorKind {
    match response {
        Response::Error(err) => err.kind,
        Response::Ok(value) => panic!("unexpected success: {}", value),
    }
}

#[tokio::test]
async fn full_scoring_flow_over_json() {
    let mut session = Session::new(common::setup().await);

    let cup = ok(send(
        &mut session,
        json!({"command": "create_competition", "name": "Spring Cup", "start_date": "2025-03-01", "end_date": "2025-03-02"}),
    )
    .await);
    let comp_id = cup["id"].as_i64().unwrap();

    let team = ok(send(
        &mut session,
        json!({"command": "create_team", "name": "Falcons", "comp_id": comp_id}),
    )
    .await);
    assert_eq!(team["score"], 0);

    let game = ok(send(
        &mut session,
        json!({"command": "create_game", "comp_id": comp_id, "name": "Relay", "team_game": "1", "date_played": "2025-03-01"}),
    )
    .await);
    assert_eq!(game["team_game"], true);

    let mode = ok(send(&mut session, json!({"command": "select_game", "game_id": game["id"]})).await);
    assert_eq!(mode, "team");

    let state = ok(send(&mut session, json!({"command": "select_team", "team_id": team["id"]})).await);
    assert_eq!(state["state"], "team_mode");
    assert_eq!(state["selection"], json!({"kind": "team", "id": team["id"]}));

    let candidates = ok(send(&mut session, json!({"command": "score_candidates"})).await);
    assert_eq!(candidates["mode"], "team");
    assert_eq!(candidates["items"][0]["name"], "Falcons");

    let event = ok(send(
        &mut session,
        json!({"command": "submit_score", "points": "8", "comment": "clean handoff"}),
    )
    .await);
    assert_eq!(event["kind"], "team");
    assert_eq!(event["event"]["points"], 8);

    let view = ok(send(&mut session, json!({"command": "score_view", "comp_id": comp_id})).await);
    assert_eq!(
        view,
        json!([{
            "team_name": "Falcons",
            "player_name": "N/A",
            "game_name": "Relay",
            "competition_name": "Spring Cup",
            "points": 8,
            "comment": "clean handoff",
            "created_at": event["event"]["created_at"],
        }])
    );
}

#[tokio::test]
async fn errors_carry_their_kind() {
    let mut session = Session::new(common::setup().await);

    assert_eq!(
        error_kind(session.handle_json("not json").await),
        ErrorKind::ValidationError
    );
    assert_eq!(
        error_kind(send(&mut session, json!({"command": "launch_rockets"})).await),
        ErrorKind::ValidationError
    );
    assert_eq!(
        error_kind(send(&mut session, json!({"command": "get_team", "id": 3})).await),
        ErrorKind::NotFoundError
    );
    assert_eq!(
        error_kind(
            send(
                &mut session,
                json!({"command": "create_team", "name": "Falcons", "comp_id": 3}),
            )
            .await
        ),
        ErrorKind::ReferenceError
    );

    let cup = ok(send(
        &mut session,
        json!({"command": "create_competition", "name": "Spring Cup", "start_date": "2025-03-01", "end_date": "2025-03-02"}),
    )
    .await);
    ok(send(
        &mut session,
        json!({"command": "create_team", "name": "Falcons", "comp_id": cup["id"]}),
    )
    .await);
    let response = send(
        &mut session,
        json!({"command": "delete_competition", "id": cup["id"]}),
    )
    .await;
    let Response::Error(err) = response else {
        panic!("delete should be refused");
    };
    assert_eq!(err.kind, ErrorKind::ReferentialIntegrityError);
    assert!(err.message.starts_with("删除比赛失败"));
}

#[tokio::test]
async fn list_commands_accept_optional_filters() {
    let mut session = Session::new(common::setup().await);
    let cup = ok(send(
        &mut session,
        json!({"command": "create_competition", "name": "Spring Cup", "start_date": "2025-03-01", "end_date": "2025-03-01"}),
    )
    .await);
    ok(send(
        &mut session,
        json!({"command": "create_player", "name": "Ann"}),
    )
    .await);

    let teams = ok(send(&mut session, json!({"command": "list_teams", "comp_id": cup["id"]})).await);
    assert_eq!(teams, json!([]));

    let players = ok(send(&mut session, json!({"command": "list_players"})).await);
    assert_eq!(players[0]["name"], "Ann");
    assert_eq!(players[0]["team_id"], Value::Null);

    let scoped = ok(send(&mut session, json!({"command": "player_view", "comp_id": cup["id"]})).await);
    assert_eq!(scoped, json!([]));

    let state = ok(send(&mut session, json!({"command": "resolver_state"})).await);
    assert_eq!(state, json!({"state": "idle"}));
}

#[tokio::test]
async fn log_level_can_be_changed_at_runtime() {
    let mut session = Session::new(common::setup().await);

    let level = ok(send(&mut session, json!({"command": "set_log_level", "level": "debug"})).await);
    assert_eq!(level, "debug");
    assert_eq!(
        error_kind(send(&mut session, json!({"command": "set_log_level", "level": "loud"})).await),
        ErrorKind::ValidationError
    );
}
