use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for the lucky number minigame service.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::minigames::list_minigames,
        crate::routes::minigames::create_minigame,
        crate::routes::minigames::get_minigame,
        crate::routes::minigames::list_tickets,
        crate::routes::minigames::select_ticket,
        crate::routes::minigames::draw,
        crate::routes::minigames::list_winners,
        crate::routes::minigames::reset_winners,
    ),
    components(
        schemas(
            crate::dto::ErrorBody,
            crate::dto::health::HealthResponse,
            crate::dto::minigame::MinigameDto,
            crate::dto::minigame::CreateMinigameRequest,
            crate::dto::ticket::TicketDto,
            crate::dto::ticket::TicketStatsDto,
            crate::dto::ticket::TicketsResponse,
            crate::dto::ticket::SelectTicketRequest,
            crate::dto::draw::DrawRequest,
            crate::dto::draw::DrawResponse,
            crate::dto::draw::PotentialWinnerDto,
            crate::dto::draw::WinnerDto,
            crate::dto::user::UserSummary,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "minigames", description = "Minigame definitions"),
        (name = "tickets", description = "Ticket registry and number claims"),
        (name = "draw", description = "Admin draw, winners and reset"),
    )
)]
pub struct ApiDoc;
