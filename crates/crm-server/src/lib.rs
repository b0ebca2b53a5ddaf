// File: crm-server/src/lib.rs
// Purpose: Router for the server-rendered CRM pages

//! # crm-server
//!
//! Axum routes rendering the dashboard, contacts, planner, property and
//! WhatsApp pages with maud. Handlers read the shared snapshot, derive view
//! state with `crm_core::view` and forward writes to `crm_sync::Commands`.

pub mod pages;
pub mod sse;
pub mod state;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

pub use state::AppState;

/// Build the application router
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(pages::dashboard::show))
        // Contacts
        .route(
            "/clientes",
            get(pages::contacts::list).post(pages::contacts::create),
        )
        .route("/clientes/exportar.csv", get(pages::contacts::export_csv))
        .route("/clientes/:id/excluir", post(pages::contacts::remove))
        .route("/clientes/:id/whatsapp", get(pages::contacts::whatsapp))
        .route("/clientes/:id/ligar", get(pages::contacts::dial))
        .route("/clientes/:id/email", get(pages::contacts::email))
        .route("/clientes/:id/copiar-email", get(pages::contacts::copy_email))
        // Planner
        .route(
            "/agenda",
            get(pages::agenda::show).post(pages::agenda::create),
        )
        .route("/agenda/:id/concluir", post(pages::agenda::toggle))
        .route("/agenda/:id/excluir", post(pages::agenda::remove))
        // Properties
        .route(
            "/imoveis",
            get(pages::properties::list).post(pages::properties::create),
        )
        .route("/imoveis/:id/excluir", post(pages::properties::remove))
        // WhatsApp composer & templates
        .route("/whatsapp", get(pages::whatsapp::show))
        .route("/whatsapp/enviar", post(pages::whatsapp::send))
        .route("/whatsapp/templates/:id", post(pages::whatsapp::update_template))
        // Preferences
        .route("/tema", post(pages::toggle_theme))
        // Change notifications
        .route("/api/eventos", get(sse::change_events_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
