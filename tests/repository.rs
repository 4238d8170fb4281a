mod common;

use comp_tracker_lib::ErrorKind;
use comp_tracker_lib::database::dto::{
    FlagValue, GameFilter, NewCompetition, NewGame, NewPlayer, NewPlayerScore, NewTeam, NewTeamScore,
    PlayerFilter, PlayerScoreFilter, TeamFilter, TeamScoreFilter,
};
use comp_tracker_lib::database::repository::{
    competitions_repository::CompetitionsRepository, games_repository::GamesRepository,
    players_repository::PlayersRepository, scores_repository::ScoresRepository,
    teams_repository::TeamsRepository,
};
use comp_tracker_lib::entity::prelude::GameMode;

#[tokio::test]
async fn competition_delete_is_blocked_while_teams_exist() {
    let db = common::setup().await;
    let cup = common::competition(&db, "Spring Cup").await;
    let falcons = common::team(&db, cup.id, "Falcons").await;

    let err = CompetitionsRepository::delete(&db, cup.id).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ReferentialIntegrityError);
    // 删除被拒绝后比赛仍然存在
    assert!(CompetitionsRepository::find_by_id(&db, cup.id).await.unwrap().is_some());

    TeamsRepository::delete(&db, falcons.id).await.unwrap();
    CompetitionsRepository::delete(&db, cup.id).await.unwrap();

    let err = CompetitionsRepository::get(&db, cup.id).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFoundError);
}

#[tokio::test]
async fn competition_delete_is_blocked_while_games_exist() {
    let db = common::setup().await;
    let cup = common::competition(&db, "Spring Cup").await;
    let relay = common::game(&db, cup.id, "Relay", true).await;

    let err = CompetitionsRepository::delete(&db, cup.id).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ReferentialIntegrityError);

    GamesRepository::delete(&db, relay.id).await.unwrap();
    CompetitionsRepository::delete(&db, cup.id).await.unwrap();
    assert!(CompetitionsRepository::find_all(&db).await.unwrap().is_empty());
}

#[tokio::test]
async fn deleting_missing_records_is_not_found() {
    let db = common::setup().await;

    for err in [
        CompetitionsRepository::delete(&db, 42).await.unwrap_err(),
        TeamsRepository::delete(&db, 42).await.unwrap_err(),
        PlayersRepository::delete(&db, 42).await.unwrap_err(),
        GamesRepository::delete(&db, 42).await.unwrap_err(),
        ScoresRepository::delete_team_score(&db, 42).await.unwrap_err(),
        ScoresRepository::delete_player_score(&db, 42).await.unwrap_err(),
    ] {
        assert_eq!(err.kind(), ErrorKind::NotFoundError);
    }
}

#[tokio::test]
async fn references_must_exist() {
    let db = common::setup().await;

    let err = TeamsRepository::create(
        &db,
        NewTeam {
            name: "Falcons".to_string(),
            comp_id: 99,
            score: 0,
        },
    )
    .await
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ReferenceError);

    let err = GamesRepository::create(
        &db,
        NewGame {
            comp_id: 99,
            name: "Relay".to_string(),
            team_game: true.into(),
            date_played: "2025-03-02".to_string(),
        },
    )
    .await
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ReferenceError);

    let err = PlayersRepository::create(
        &db,
        NewPlayer {
            name: "Ann".to_string(),
            team_id: Some(99),
        },
    )
    .await
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ReferenceError);

    let cup = common::competition(&db, "Spring Cup").await;
    let relay = common::game(&db, cup.id, "Relay", true).await;
    let err = ScoresRepository::create_team_score(
        &db,
        NewTeamScore {
            team_id: 99,
            game_id: relay.id,
            points: 10.into(),
            comment: None,
        },
    )
    .await
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ReferenceError);

    let err = ScoresRepository::create_team_score(
        &db,
        NewTeamScore {
            team_id: 1,
            game_id: 99,
            points: 10.into(),
            comment: None,
        },
    )
    .await
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ReferenceError);

    // 失败的写入不留下任何记录
    assert!(TeamsRepository::find_all(&db, TeamFilter::default()).await.unwrap().is_empty());
    assert!(
        ScoresRepository::find_team_scores(&db, TeamScoreFilter::default())
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn invalid_fields_are_rejected_before_writing() {
    let db = common::setup().await;

    let bad_competitions = [
        ("  ", "2025-03-01", "2025-03-02"),
        ("Spring Cup", "", "2025-03-02"),
        ("Spring Cup", "2025-13-01", "2025-03-02"),
        ("Spring Cup", "2025-03-05", "2025-03-01"),
    ];
    for (name, start, end) in bad_competitions {
        let err = CompetitionsRepository::create(
            &db,
            NewCompetition {
                name: name.to_string(),
                start_date: start.to_string(),
                end_date: end.to_string(),
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValidationError, "{} {} {}", name, start, end);
    }
    assert!(CompetitionsRepository::find_all(&db).await.unwrap().is_empty());

    let cup = common::competition(&db, "Spring Cup").await;
    let err = GamesRepository::create(
        &db,
        NewGame {
            comp_id: cup.id,
            name: "Relay".to_string(),
            team_game: "sometimes".into(),
            date_played: "2025-03-02".to_string(),
        },
    )
    .await
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ValidationError);

    let relay = common::game(&db, cup.id, "Relay", true).await;
    let falcons = common::team(&db, cup.id, "Falcons").await;
    let err = ScoresRepository::create_team_score(
        &db,
        NewTeamScore {
            team_id: falcons.id,
            game_id: relay.id,
            points: "ten".into(),
            comment: None,
        },
    )
    .await
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ValidationError);
}

#[tokio::test]
async fn created_records_round_trip() {
    let db = common::setup().await;
    let cup = common::competition(&db, "  Spring Cup ").await;
    assert_eq!(cup.name, "Spring Cup");
    assert_eq!(CompetitionsRepository::get(&db, cup.id).await.unwrap(), cup);

    let falcons = common::team(&db, cup.id, "Falcons").await;
    assert_eq!(falcons.score, 0);
    assert_eq!(falcons.comp_id, cup.id);

    let relay = GamesRepository::create(
        &db,
        NewGame {
            comp_id: cup.id,
            name: "Relay".to_string(),
            team_game: FlagValue::Int(1),
            date_played: "2025-03-02".to_string(),
        },
    )
    .await
    .unwrap();
    assert!(relay.team_game);
    assert_eq!(relay.mode(), GameMode::Team);
    assert_eq!(GamesRepository::get(&db, relay.id).await.unwrap(), relay);

    let score = ScoresRepository::create_team_score(
        &db,
        NewTeamScore {
            team_id: falcons.id,
            game_id: relay.id,
            points: "-3".into(),
            comment: Some("  false start ".to_string()),
        },
    )
    .await
    .unwrap();
    assert_eq!(score.points, -3);
    assert_eq!(score.comment.as_deref(), Some("false start"));
    assert_eq!(
        ScoresRepository::get_team_score(&db, score.id).await.unwrap(),
        score
    );
}

#[tokio::test]
async fn lists_filter_and_keep_insertion_order() {
    let db = common::setup().await;
    let spring = common::competition(&db, "Spring Cup").await;
    let autumn = common::competition(&db, "Autumn Cup").await;

    let falcons = common::team(&db, spring.id, "Falcons").await;
    let hawks = common::team(&db, autumn.id, "Hawks").await;
    let owls = common::team(&db, spring.id, "Owls").await;

    let all: Vec<_> = TeamsRepository::find_all(&db, TeamFilter::default())
        .await
        .unwrap()
        .into_iter()
        .map(|t| t.name)
        .collect();
    assert_eq!(all, ["Falcons", "Hawks", "Owls"]);

    let spring_teams: Vec<_> = TeamsRepository::find_all(
        &db,
        TeamFilter {
            comp_id: Some(spring.id),
        },
    )
    .await
    .unwrap()
    .into_iter()
    .map(|t| t.id)
    .collect();
    assert_eq!(spring_teams, [falcons.id, owls.id]);

    let ann = common::player(&db, Some(falcons.id), "Ann").await;
    common::player(&db, Some(hawks.id), "Bob").await;
    let falcon_players = PlayersRepository::find_all(
        &db,
        PlayerFilter {
            team_id: Some(falcons.id),
        },
    )
    .await
    .unwrap();
    assert_eq!(falcon_players, vec![ann.clone()]);

    let in_spring = PlayersRepository::find_in_competition(&db, spring.id).await.unwrap();
    assert_eq!(in_spring, vec![ann]);

    common::game(&db, spring.id, "Relay", true).await;
    common::game(&db, autumn.id, "Sprint", false).await;
    let autumn_games = GamesRepository::find_all(
        &db,
        GameFilter {
            comp_id: Some(autumn.id),
        },
    )
    .await
    .unwrap();
    assert_eq!(autumn_games.len(), 1);
    assert_eq!(autumn_games[0].name, "Sprint");
}

#[tokio::test]
async fn score_writes_must_match_game_mode() {
    let db = common::setup().await;
    let cup = common::competition(&db, "Spring Cup").await;
    let falcons = common::team(&db, cup.id, "Falcons").await;
    let ann = common::player(&db, Some(falcons.id), "Ann").await;
    let relay = common::game(&db, cup.id, "Relay", true).await;
    let sprint = common::game(&db, cup.id, "Sprint", false).await;

    let err = ScoresRepository::create_player_score(
        &db,
        NewPlayerScore {
            player_id: ann.id,
            game_id: relay.id,
            points: 5.into(),
            comment: None,
        },
    )
    .await
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ValidationError);

    let err = ScoresRepository::create_team_score(
        &db,
        NewTeamScore {
            team_id: falcons.id,
            game_id: sprint.id,
            points: 5.into(),
            comment: None,
        },
    )
    .await
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ValidationError);

    ScoresRepository::create_player_score(
        &db,
        NewPlayerScore {
            player_id: ann.id,
            game_id: sprint.id,
            points: 7.into(),
            comment: None,
        },
    )
    .await
    .unwrap();

    let logged = ScoresRepository::find_player_scores(
        &db,
        PlayerScoreFilter {
            player_id: Some(ann.id),
            game_id: None,
        },
    )
    .await
    .unwrap();
    assert_eq!(logged.len(), 1);
    assert_eq!(logged[0].game_id, sprint.id);
}

#[tokio::test]
async fn deleting_a_team_keeps_its_players_and_scores() {
    let db = common::setup().await;
    let cup = common::competition(&db, "Spring Cup").await;
    let falcons = common::team(&db, cup.id, "Falcons").await;
    let ann = common::player(&db, Some(falcons.id), "Ann").await;
    let relay = common::game(&db, cup.id, "Relay", true).await;
    let score = ScoresRepository::create_team_score(
        &db,
        NewTeamScore {
            team_id: falcons.id,
            game_id: relay.id,
            points: 10.into(),
            comment: None,
        },
    )
    .await
    .unwrap();

    TeamsRepository::delete(&db, falcons.id).await.unwrap();

    assert_eq!(PlayersRepository::get(&db, ann.id).await.unwrap().team_id, Some(falcons.id));
    assert_eq!(
        ScoresRepository::get_team_score(&db, score.id).await.unwrap().team_id,
        falcons.id
    );
}
