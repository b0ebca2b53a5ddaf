// Route-level tests over an in-memory data service

use axum::http::StatusCode;
use axum_test::TestServer;
use crm_core::config::AgentConfig;
use crm_core::{Collection, RawContact};
use crm_server::{app, AppState};
use crm_sync::{MemoryDataService, MemoryPreferences, SnapshotStore};
use pretty_assertions::assert_eq;
use rstest::rstest;
use std::sync::Arc;

struct Harness {
    server: TestServer,
    service: Arc<MemoryDataService>,
    store: Arc<SnapshotStore>,
}

fn harness() -> Harness {
    let service = Arc::new(MemoryDataService::new());
    let store = Arc::new(SnapshotStore::new());
    let state = AppState::new(
        service.clone(),
        store.clone(),
        Arc::new(MemoryPreferences::new()),
        &AgentConfig::default(),
    );
    let server = TestServer::new(app(state)).unwrap();

    Harness {
        server,
        service,
        store,
    }
}

async fn add_maria(harness: &Harness) -> String {
    let response = harness
        .server
        .post("/clientes")
        .form(&[
            ("nome", "Maria Silva"),
            ("email", "maria@exemplo.com"),
            ("telefone", "(21) 99888-7766"),
            ("imovel_interesse_id", "0"),
        ])
        .await;
    response.assert_status(StatusCode::SEE_OTHER);

    let snapshot = harness.store.snapshot().await;
    snapshot.contacts[0].id.as_str().to_string()
}

#[rstest]
#[case("/")]
#[case("/clientes")]
#[case("/agenda")]
#[case("/agenda?dia=2024-06-01")]
#[case("/imoveis?tipo=Casa&faixa=300k")]
#[case("/whatsapp?template=2")]
#[tokio::test]
async fn test_pages_render(#[case] path: &str) {
    let harness = harness();

    let response = harness.server.get(path).await;

    response.assert_status_ok();
    assert!(response.text().contains("CRM Alexandre Nascimento"));
}

#[tokio::test]
async fn test_add_contact_redirects_and_lists() {
    let harness = harness();
    add_maria(&harness).await;

    let response = harness.server.get("/clientes?aviso=cliente-adicionado").await;
    let html = response.text();
    assert!(html.contains("Cliente adicionado com sucesso!"));
    assert!(html.contains("Maria Silva"));
    assert!(html.contains("MS"));
}

#[tokio::test]
async fn test_invalid_contact_keeps_input() {
    let harness = harness();

    let response = harness
        .server
        .post("/clientes")
        .form(&[("nome", "  "), ("email", "sem-nome@exemplo.com")])
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    let html = response.text();
    assert!(html.contains("sem-nome@exemplo.com"));
    assert!(html.contains("Informe o nome do cliente."));
    assert!(!html.contains("EventSource"));
    assert!(harness.store.snapshot().await.contacts.is_empty());
}

#[tokio::test]
async fn test_write_failure_is_bad_gateway() {
    let harness = harness();
    harness.service.set_write_failure(true).await;

    let response = harness
        .server
        .post("/imoveis")
        .form(&[
            ("titulo", "Casa na praia"),
            ("endereco", "Av. Atlântica, 100"),
            ("valor", "850000"),
            ("tipo", "Casa"),
        ])
        .await;

    response.assert_status(StatusCode::BAD_GATEWAY);
    assert!(response.text().contains("Casa na praia"));
}

#[tokio::test]
async fn test_failed_fetch_keeps_page_usable() {
    let harness = harness();
    add_maria(&harness).await;
    harness
        .service
        .set_fetch_failure(Collection::Contacts, true)
        .await;

    let report = harness.store.reload_all(harness.service.as_ref()).await;
    assert_eq!(report.failed, vec![Collection::Contacts]);

    let response = harness.server.get("/clientes").await;
    response.assert_status_ok();
    assert!(response.text().contains("Maria Silva"));
}

#[tokio::test]
async fn test_contact_with_control_characters_is_rejected() {
    let harness = harness();

    let response = harness
        .server
        .post("/clientes")
        .form(&[
            ("nome", "Ana"),
            ("email", "ana\u{7f}@x.com"),
            ("telefone", "2199\u{1}8887766"),
        ])
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    let html = response.text();
    assert!(html.contains("O email contém caracteres inválidos."));
    assert!(html.contains("O telefone contém caracteres inválidos."));
    assert!(harness.store.snapshot().await.contacts.is_empty());
}

#[rstest]
#[case("email")]
#[case("ligar")]
#[case("whatsapp")]
#[tokio::test]
async fn test_stored_control_characters_never_reach_location(#[case] action: &str) {
    let harness = harness();
    harness
        .service
        .seed_raw_contacts(vec![RawContact {
            id: "c1".to_string(),
            nome: "Ana".to_string(),
            email: Some("ana\u{7f}@x.com".to_string()),
            telefone: Some("2199\u{1}8887766".to_string()),
            imovel_interesse_id: None,
        }])
        .await;
    harness.store.reload_all(harness.service.as_ref()).await;

    let response = harness.server.get(&format!("/clientes/c1/{action}")).await;

    if action == "whatsapp" {
        // only the digits make it into the chat link
        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(response.header("location"), "https://wa.me/5521998887766?text=");
    } else {
        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
        assert!(response.text().contains("link inválido"));
    }
}

#[tokio::test]
async fn test_export_without_contacts_is_refused() {
    let harness = harness();

    let response = harness.server.get("/clientes/exportar.csv").await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_export_returns_csv_attachment() {
    let harness = harness();
    let id = add_maria(&harness).await;

    let response = harness.server.get("/clientes/exportar.csv").await;

    response.assert_status_ok();
    let disposition = response.header("content-disposition");
    let disposition = disposition.to_str().unwrap();
    assert!(disposition.starts_with("attachment; filename=\"clientes_crm_"));
    assert_eq!(
        response.text(),
        format!(
            "ID,Nome,Email,Telefone,Imovel_Interesse_ID\n\
             \"{id}\",\"Maria Silva\",\"maria@exemplo.com\",\"(21) 99888-7766\",\"\""
        )
    );
}

#[tokio::test]
async fn test_contact_actions_redirect_to_deep_links() {
    let harness = harness();
    let id = add_maria(&harness).await;

    let whatsapp = harness.server.get(&format!("/clientes/{id}/whatsapp")).await;
    whatsapp.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(whatsapp.header("location"), "https://wa.me/5521998887766?text=");

    let dial = harness.server.get(&format!("/clientes/{id}/ligar")).await;
    assert_eq!(dial.header("location"), "tel:(21)99888-7766");

    let missing = harness.server.get("/clientes/nao-existe/email").await;
    missing.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_agenda_toggle_returns_to_day() {
    let harness = harness();
    let response = harness
        .server
        .post("/agenda")
        .form(&[
            ("titulo", "Visita ao apartamento"),
            ("data_compromisso", "2024-06-01"),
            ("prioridade", "Alta"),
            ("cliente_id", "0"),
        ])
        .await;
    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(
        response.header("location"),
        "/agenda?dia=2024-06-01&aviso=compromisso-adicionado"
    );

    let id = harness.store.snapshot().await.appointments[0]
        .id
        .as_str()
        .to_string();
    let toggled = harness
        .server
        .post(&format!("/agenda/{id}/concluir"))
        .form(&[("dia", "2024-06-01")])
        .await;
    toggled.assert_status(StatusCode::SEE_OTHER);
    assert!(harness.store.snapshot().await.appointments[0].completed);

    let page = harness.server.get("/agenda?dia=2024-06-01").await;
    assert!(page.text().contains("Reabrir"));
}

#[tokio::test]
async fn test_whatsapp_send_validates_number() {
    let harness = harness();

    let rejected = harness
        .server
        .post("/whatsapp/enviar")
        .form(&[("numero", "1234"), ("mensagem", "Olá")])
        .await;
    rejected.assert_status(StatusCode::UNPROCESSABLE_ENTITY);

    let accepted = harness
        .server
        .post("/whatsapp/enviar")
        .form(&[("numero", "11 98765-4321"), ("mensagem", "Olá!")])
        .await;
    accepted.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(
        accepted.header("location"),
        "https://wa.me/5511987654321?text=Ol%C3%A1%21"
    );
}

#[tokio::test]
async fn test_template_update_and_theme_toggle() {
    let harness = harness();

    let saved = harness
        .server
        .post("/whatsapp/templates/1")
        .form(&[("texto", "Bom dia! Posso ajudar?")])
        .await;
    saved.assert_status(StatusCode::SEE_OTHER);
    let page = harness.server.get("/whatsapp?template=1").await;
    assert!(page.text().contains("Bom dia! Posso ajudar?"));

    let unknown = harness
        .server
        .post("/whatsapp/templates/99")
        .form(&[("texto", "Qualquer")])
        .await;
    unknown.assert_status(StatusCode::NOT_FOUND);

    let toggled = harness
        .server
        .post("/tema")
        .form(&[("voltar", "/agenda")])
        .await;
    toggled.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(toggled.header("location"), "/agenda");
    assert!(harness.server.get("/").await.text().contains("tema-escuro"));
}

#[rstest]
#[case("/\\evil.example")]
#[case("//evil.example")]
#[case("https://evil.example")]
#[tokio::test]
async fn test_theme_toggle_stays_on_site(#[case] voltar: &str) {
    let harness = harness();

    let response = harness.server.post("/tema").form(&[("voltar", voltar)]).await;

    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(response.header("location"), "/");
}
