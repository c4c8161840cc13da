use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use lucky_draw::{
    client::{
        ClientConfig, ClientError, MinigameClient, StaticToken, TokenProvider, toast::ToastLog,
    },
    clock::{Clock, ManualClock},
    config::UserAccount,
    dao::minigame_store::InMemoryMinigameStore,
    dto::{draw::DrawRequest, minigame::CreateMinigameRequest, minigame::MinigameDto, user::Role},
    routes,
    services::minigame_service,
    state::{AppState, UserRegistry},
    views::{
        admin::{AdminDrawView, RESET_PROMPT},
        draw_panel::{BusyFlags, DrawPhase},
        grid::CellState,
        player::{PlayerMinigameView, TICKET_CONFIRMED_MESSAGE},
        selection::SelectionPhase,
    },
};
use reqwest::StatusCode;
use time::{Duration, macros::datetime};
use tokio::net::TcpListener;

const ADMIN: &str = "admin-token";
const PLAYERS: [&str; 4] = ["lan-token", "minh-token", "hoa-token", "tuan-token"];

/// Token provider that counts how many requests were sent with it.
struct CountingToken {
    token: String,
    requests: AtomicUsize,
}

impl TokenProvider for CountingToken {
    fn bearer_token(&self) -> Option<String> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        Some(self.token.clone())
    }
}

struct Harness {
    base_url: String,
    minigame: MinigameDto,
    clock: Arc<ManualClock>,
}

impl Harness {
    async fn start(max_number: u32, max_winners: u32) -> Self {
        let mut accounts = vec![UserAccount::new(ADMIN, "admin", "Admin", Role::Admin)];
        for (index, token) in PLAYERS.iter().enumerate() {
            accounts.push(UserAccount::new(
                *token,
                format!("p-{index}"),
                format!("Player {index}"),
                Role::Player,
            ));
        }

        let clock = Arc::new(ManualClock::new(datetime!(2026-10-19 12:00 UTC)));
        let state = AppState::new(
            Arc::new(InMemoryMinigameStore::new()),
            UserRegistry::from_accounts(accounts),
            clock.clone(),
        );

        let minigame = minigame_service::create_minigame(
            &state,
            CreateMinigameRequest {
                name: "Lucky Ten".into(),
                contest_id: "contest-1".into(),
                start_time: datetime!(2026-10-19 10:00 UTC),
                end_time: datetime!(2026-10-19 18:00 UTC),
                max_number,
                max_winners,
                is_active: true,
            },
        )
        .await
        .unwrap();

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, routes::router(state)).await.unwrap();
        });

        Self {
            base_url: format!("http://{addr}"),
            minigame,
            clock,
        }
    }

    fn client(&self, token: &str) -> MinigameClient {
        MinigameClient::new(
            ClientConfig::new(self.base_url.clone()),
            Arc::new(StaticToken(token.to_string())),
        )
        .unwrap()
    }

    fn player(&self, token: &str) -> (PlayerMinigameView, Arc<ToastLog>) {
        let toasts = Arc::new(ToastLog::new());
        let clock: Arc<dyn Clock> = self.clock.clone();
        let view = PlayerMinigameView::new(
            self.client(token),
            self.minigame.clone(),
            clock,
            toasts.clone(),
        );
        (view, toasts)
    }

    fn admin(&self) -> (AdminDrawView, Arc<ToastLog>) {
        let toasts = Arc::new(ToastLog::new());
        let view = AdminDrawView::new(self.client(ADMIN), self.minigame.id, toasts.clone());
        (view, toasts)
    }

    async fn claim(&self, token: &str, number: u32) {
        self.client(token)
            .select_ticket(self.minigame.id, number)
            .await
            .unwrap();
    }
}

#[tokio::test]
async fn player_selects_and_confirms_a_number() {
    let harness = Harness::start(10, 1).await;
    let (mut view, toasts) = harness.player(PLAYERS[0]);
    view.refresh().await.unwrap();

    let registry = view.registry().unwrap();
    assert!(registry.tickets.is_empty());
    assert_eq!(registry.ticket_stats.available_tickets, 10);
    assert_eq!(view.grid().counts().available, 10);

    assert!(view.click(7));
    assert_eq!(view.grid().cell_state(7), Some(CellState::Selected));
    view.confirm().await.unwrap();

    assert!(matches!(view.phase(), SelectionPhase::Confirmed(ticket) if ticket.number == 7));
    assert_eq!(toasts.last().unwrap().message, TICKET_CONFIRMED_MESSAGE);

    let registry = view.registry().unwrap();
    assert_eq!(registry.ticket_stats.taken_numbers, vec![7]);
    assert_eq!(registry.ticket_stats.taken_tickets, 1);
    assert_eq!(registry.ticket_stats.available_tickets, 9);
    assert_eq!(registry.user_tickets.len(), 1);
    assert_eq!(view.grid().cell_state(7), Some(CellState::Taken));
}

#[tokio::test]
async fn refetching_the_registry_is_idempotent() {
    let harness = Harness::start(10, 1).await;
    harness.claim(PLAYERS[1], 3).await;

    let (mut view, _) = harness.player(PLAYERS[0]);
    view.refresh().await.unwrap();
    let first = view.registry().cloned().unwrap();
    view.refresh().await.unwrap();
    assert_eq!(view.registry(), Some(&first));
    assert!(first.user_tickets.is_empty());
}

#[tokio::test]
async fn ticket_holder_cannot_pick_again() {
    let harness = Harness::start(10, 1).await;
    let (mut view, _) = harness.player(PLAYERS[0]);
    view.refresh().await.unwrap();
    view.click(7);
    view.confirm().await.unwrap();

    assert!(view.holds_ticket());
    assert!(!view.click(8));
    assert_eq!(view.grid().selected(), None);

    let err = harness
        .client(PLAYERS[0])
        .select_ticket(harness.minigame.id, 8)
        .await
        .unwrap_err();
    assert!(err.is_conflict());
    assert_eq!(err.toast_message(), "you already hold number 7 in this minigame");
}

#[tokio::test]
async fn racing_confirms_produce_exactly_one_ticket() {
    let harness = Harness::start(10, 1).await;
    let (mut lan, lan_toasts) = harness.player(PLAYERS[0]);
    let (mut minh, minh_toasts) = harness.player(PLAYERS[1]);
    lan.refresh().await.unwrap();
    minh.refresh().await.unwrap();

    assert!(lan.click(7));
    assert!(minh.click(7));
    let (lan_outcome, minh_outcome) = tokio::join!(lan.confirm(), minh.confirm());
    assert_eq!(
        [lan_outcome.is_ok(), minh_outcome.is_ok()]
            .iter()
            .filter(|ok| **ok)
            .count(),
        1
    );

    let (winner, loser, loser_toasts) = if lan_outcome.is_ok() {
        (&lan, &minh, &minh_toasts)
    } else {
        (&minh, &lan, &lan_toasts)
    };
    assert!(matches!(winner.phase(), SelectionPhase::Confirmed(_)));
    assert_eq!(loser.phase(), &SelectionPhase::NumberPending(7));
    assert_eq!(loser.flow().last_error(), Some("number 7 is already taken"));
    assert_eq!(loser_toasts.errors(), vec!["number 7 is already taken".to_string()]);
    assert_eq!(loser.grid().cell_state(7), Some(CellState::Taken));
    assert!(!loser.holds_ticket());

    let registry = harness
        .client(ADMIN)
        .fetch_tickets(harness.minigame.id)
        .await
        .unwrap();
    assert_eq!(registry.tickets.len(), 1);
}

#[tokio::test]
async fn closed_view_discards_its_claim() {
    let harness = Harness::start(10, 1).await;
    let (mut view, toasts) = harness.player(PLAYERS[0]);
    view.refresh().await.unwrap();
    view.click(5);
    view.close();

    let err = view.confirm().await.unwrap_err();
    assert!(err.is_cancelled());
    assert!(toasts.toasts().is_empty());

    let registry = harness
        .client(PLAYERS[1])
        .fetch_tickets(harness.minigame.id)
        .await
        .unwrap();
    assert!(registry.tickets.is_empty());
}

#[tokio::test]
async fn closed_window_blocks_clicks_and_claims() {
    let harness = Harness::start(10, 1).await;
    let (mut view, _) = harness.player(PLAYERS[0]);
    view.refresh().await.unwrap();

    harness.clock.advance(Duration::hours(7));
    assert!(!view.click(2));

    let err = harness
        .client(PLAYERS[0])
        .select_ticket(harness.minigame.id, 2)
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::BAD_REQUEST));
}

#[tokio::test]
async fn out_of_range_numbers_are_rejected() {
    let harness = Harness::start(10, 1).await;
    let err = harness
        .client(PLAYERS[0])
        .select_ticket(harness.minigame.id, 11)
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::BAD_REQUEST));
    assert_eq!(err.toast_message(), "number must be between 1 and 10");
}

#[tokio::test]
async fn previews_never_create_winners() {
    let harness = Harness::start(20, 2).await;
    for (token, number) in PLAYERS.iter().zip([3, 8, 12, 19]) {
        harness.claim(token, number).await;
    }

    let (admin, _) = harness.admin();
    for _ in 0..5 {
        let candidate = admin.preview().await.unwrap().unwrap();
        assert!([3, 8, 12, 19].contains(&candidate.number));
        assert!(candidate.user.display_name.starts_with("Player"));
    }

    assert!(admin.refresh_winners().await.unwrap().is_empty());
    assert!(admin.panel().previewed_number().is_some());
    admin.discard();
    assert_eq!(admin.panel().phase(), DrawPhase::NoPreview);
}

#[tokio::test]
async fn confirm_commits_the_previewed_number() {
    let harness = Harness::start(10, 1).await;
    harness.claim(PLAYERS[0], 4).await;
    harness.claim(PLAYERS[1], 6).await;

    let (admin, toasts) = harness.admin();
    let candidate = admin.preview().await.unwrap().unwrap();
    let winner = admin.confirm().await.unwrap().unwrap();

    assert_eq!(winner.ticket_number, candidate.number);
    let panel = admin.panel();
    assert_eq!(panel.phase(), DrawPhase::NoPreview);
    assert_eq!(panel.winners().len(), 1);
    assert!(!panel.busy().confirming);
    assert!(toasts.errors().is_empty());
}

#[tokio::test]
async fn winner_cap_is_enforced_and_reset_clears_it() {
    let harness = Harness::start(10, 2).await;
    for (token, number) in PLAYERS.iter().take(3).zip([1, 2, 3]) {
        harness.claim(token, number).await;
    }

    let (admin, toasts) = harness.admin();
    admin.confirm().await.unwrap().unwrap();
    admin.confirm().await.unwrap().unwrap();

    let err = admin.confirm().await.unwrap_err();
    assert!(err.is_conflict());
    assert_eq!(
        toasts.errors(),
        vec!["all 2 winners have already been drawn".to_string()]
    );
    assert!(admin.preview().await.unwrap_err().is_conflict());
    assert_eq!(admin.panel().winners().len(), 2);

    assert!(!admin.reset(|_| false).await.unwrap());
    assert_eq!(admin.refresh_winners().await.unwrap().len(), 2);

    let confirmed = admin
        .reset(|question| {
            assert_eq!(question, RESET_PROMPT);
            true
        })
        .await
        .unwrap();
    assert!(confirmed);
    assert!(admin.panel().winners().is_empty());
    assert!(admin.refresh_winners().await.unwrap().is_empty());

    let registry = harness
        .client(ADMIN)
        .fetch_tickets(harness.minigame.id)
        .await
        .unwrap();
    assert_eq!(registry.tickets.len(), 3);
}

#[tokio::test]
async fn drawing_without_tickets_is_a_bad_request() {
    let harness = Harness::start(10, 1).await;
    let err = harness
        .client(ADMIN)
        .draw(harness.minigame.id, &DrawRequest::preview())
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::BAD_REQUEST));
    assert_eq!(err.toast_message(), "no eligible tickets left to draw");
}

#[tokio::test]
async fn tokens_and_roles_are_checked() {
    let harness = Harness::start(10, 1).await;

    let err = harness
        .client("bogus")
        .fetch_tickets(harness.minigame.id)
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Unauthorized));

    let err = harness
        .client(PLAYERS[0])
        .draw(harness.minigame.id, &DrawRequest::preview())
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::FORBIDDEN));

    let err = harness
        .client(PLAYERS[0])
        .reset_winners(harness.minigame.id)
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::FORBIDDEN));
}

#[tokio::test]
async fn unknown_minigame_is_not_found() {
    let harness = Harness::start(10, 1).await;
    let err = harness
        .client(PLAYERS[0])
        .fetch_tickets(uuid::Uuid::new_v4())
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
}

#[tokio::test]
async fn healthcheck_is_public() {
    let harness = Harness::start(10, 1).await;
    let response = reqwest::get(format!("{}/healthcheck", harness.base_url))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["minigames"], 1);
}

#[tokio::test]
async fn reset_reloads_the_winner_list() {
    let harness = Harness::start(10, 2).await;
    harness.claim(PLAYERS[0], 1).await;
    harness.claim(PLAYERS[1], 2).await;

    let tokens = Arc::new(CountingToken {
        token: ADMIN.to_string(),
        requests: AtomicUsize::new(0),
    });
    let client = MinigameClient::new(ClientConfig::new(harness.base_url.clone()), tokens.clone())
        .unwrap();
    let toasts = Arc::new(ToastLog::new());
    let admin = AdminDrawView::new(client, harness.minigame.id, toasts.clone());

    admin.confirm().await.unwrap().unwrap();
    assert_eq!(admin.panel().winners().len(), 1);

    tokens.requests.store(0, Ordering::SeqCst);
    assert!(admin.reset(|_| true).await.unwrap());
    // DELETE followed by GET of the winner list.
    assert_eq!(tokens.requests.load(Ordering::SeqCst), 2);
    assert!(admin.panel().winners().is_empty());
    assert!(toasts.errors().is_empty());
}

#[tokio::test]
async fn double_clicks_on_the_admin_panel_send_one_request() {
    let harness = Harness::start(10, 3).await;
    harness.claim(PLAYERS[0], 1).await;
    harness.claim(PLAYERS[1], 2).await;

    let (admin, _) = harness.admin();
    let twin = admin.clone();

    let (first, second) = tokio::join!(admin.preview(), twin.preview());
    let first = first.unwrap();
    let second = second.unwrap();
    assert!(first.is_some() != second.is_some());

    let (first, second) = tokio::join!(admin.confirm(), twin.confirm());
    let first = first.unwrap();
    let second = second.unwrap();
    assert!(first.is_some() != second.is_some());

    let winners = harness
        .client(ADMIN)
        .fetch_winners(harness.minigame.id)
        .await
        .unwrap();
    assert_eq!(winners.len(), 1);
    assert_eq!(twin.panel().winners().len(), 1);
    assert_eq!(twin.panel().busy(), BusyFlags::default());
}

#[tokio::test]
async fn player_grid_marks_committed_winners() {
    let harness = Harness::start(10, 1).await;
    let (mut view, _) = harness.player(PLAYERS[0]);
    view.refresh().await.unwrap();
    view.click(7);
    view.confirm().await.unwrap();
    harness.claim(PLAYERS[1], 3).await;

    let (admin, _) = harness.admin();
    admin.preview().await.unwrap();
    let winner = admin.confirm().await.unwrap().unwrap();
    let loser = if winner.ticket_number == 7 { 3 } else { 7 };

    view.refresh().await.unwrap();
    assert_eq!(view.winners().len(), 1);
    let grid = view.grid();
    assert_eq!(grid.cell_state(winner.ticket_number), Some(CellState::Winner));
    assert_eq!(grid.cell_state(loser), Some(CellState::Taken));
    assert_eq!(grid.counts().winners, 1);
    assert_eq!(grid.counts().taken, 2);
}

#[tokio::test]
async fn malformed_bodies_get_a_json_error() {
    let harness = Harness::start(10, 1).await;
    let response = reqwest::Client::new()
        .post(format!(
            "{}/minigames/{}/tickets",
            harness.base_url, harness.minigame.id
        ))
        .bearer_auth(PLAYERS[0])
        .header(reqwest::header::CONTENT_TYPE, "application/json")
        .body(r#"{"number": -1}"#)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: lucky_draw::dto::ErrorBody = response.json().await.unwrap();
    assert!(!body.error.is_empty());

    let response = reqwest::Client::new()
        .post(format!("{}/minigames/{}/draw", harness.base_url, harness.minigame.id))
        .bearer_auth(ADMIN)
        .header(reqwest::header::CONTENT_TYPE, "application/json")
        .body("not json")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: lucky_draw::dto::ErrorBody = response.json().await.unwrap();
    assert!(!body.error.is_empty());
}
