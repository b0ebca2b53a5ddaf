// File: crm-server/src/pages/layout.rs
// Purpose: Shared page shell (navigation, theme toggle, notices)

use maud::{html, Markup, PreEscaped, DOCTYPE};

use super::Notice;
use crate::state::AppState;

const STYLE: &str = r#"
body { font-family: system-ui, sans-serif; margin: 0; background: #f5f6f8; color: #1f2430; }
body.tema-escuro { background: #16181d; color: #e6e8ee; }
header {
  display: flex;
  align-items: center;
  gap: 1rem;
  padding: .75rem 1.5rem;
  background: #1f4e79;
  color: #fff;
}
header nav a { color: #fff; margin-right: 1rem; text-decoration: none; }
header nav a.ativo { font-weight: 700; border-bottom: 2px solid #fff; }
main { padding: 1.5rem; max-width: 1100px; margin: 0 auto; }
.aviso { padding: .75rem 1rem; border-radius: 6px; margin-bottom: 1rem; }
.aviso-sucesso { background: #dff3e4; color: #1e5b2f; }
.aviso-erro { background: #fbe3e3; color: #7a1c1c; }
.cartoes { display: grid; grid-template-columns: repeat(auto-fill, minmax(240px, 1fr)); gap: 1rem; }
.cartao {
  background: #fff;
  border-radius: 8px;
  padding: 1rem;
  box-shadow: 0 1px 3px rgba(0,0,0,.08);
}
body.tema-escuro .cartao { background: #22252d; }
.erro-campo { color: #b3261e; display: block; }
.prioridade-alta { border-left: 4px solid #c0392b; }
.prioridade-media { border-left: 4px solid #e67e22; }
.prioridade-baixa { border-left: 4px solid #27ae60; }
.concluido { opacity: .6; text-decoration: line-through; }
.avatar {
  display: inline-flex;
  width: 2.5rem;
  height: 2.5rem;
  border-radius: 50%;
  background: #1f4e79;
  color: #fff;
  align-items: center;
  justify-content: center;
  font-weight: 700;
}
form.inline { display: inline; }
"#;

// Reload on change notifications unless the user is typing in a form
const LIVE_RELOAD: &str = r#"
new EventSource('/api/eventos').addEventListener('sync', function () {
  var active = document.activeElement;
  if (!active || !active.form) { window.location.reload(); }
});
"#;

/// Top-level navigation entries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Dashboard,
    Contacts,
    Agenda,
    Properties,
    Whatsapp,
}

impl Tab {
    pub const ALL: [Tab; 5] = [
        Tab::Dashboard,
        Tab::Contacts,
        Tab::Agenda,
        Tab::Properties,
        Tab::Whatsapp,
    ];

    pub fn path(self) -> &'static str {
        match self {
            Tab::Dashboard => "/",
            Tab::Contacts => "/clientes",
            Tab::Agenda => "/agenda",
            Tab::Properties => "/imoveis",
            Tab::Whatsapp => "/whatsapp",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Tab::Dashboard => "Painel",
            Tab::Contacts => "Clientes",
            Tab::Agenda => "Agenda",
            Tab::Properties => "Imóveis",
            Tab::Whatsapp => "WhatsApp",
        }
    }
}

/// Everything the shell needs besides the page body
#[derive(Debug, Clone)]
pub struct Chrome {
    pub agent_name: String,
    pub dark_mode: bool,
    pub tab: Tab,
    pub notice: Option<Notice>,
    /// Reload when the data service reports a change; off for re-rendered
    /// form submissions so a reload never re-posts them
    pub live: bool,
}

impl Chrome {
    pub fn new(state: &AppState, tab: Tab) -> Self {
        Self {
            agent_name: state.agent_name.clone(),
            dark_mode: state.commands.dark_mode(),
            tab,
            notice: None,
            live: true,
        }
    }

    pub fn with_notice(mut self, notice: Option<Notice>) -> Self {
        self.notice = notice;
        self
    }

    /// Page rendered in answer to a rejected POST
    pub fn after_failed_submit(mut self, notice: Notice) -> Self {
        self.notice = Some(notice);
        self.live = false;
        self
    }
}

fn notice_banner(notice: &Notice) -> Markup {
    match notice {
        Notice::Success(message) => html! { div.aviso.aviso-sucesso role="status" { (message) } },
        Notice::Error(message) => html! { div.aviso.aviso-erro role="alert" { (message) } },
    }
}

/// Render a full HTML page
pub fn page(chrome: &Chrome, body: Markup) -> Markup {
    let title = format!("{} | CRM {}", chrome.tab.label(), chrome.agent_name);

    html! {
        (DOCTYPE)
        html lang="pt-BR" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) }
                style { (PreEscaped(STYLE)) }
            }
            body class=[chrome.dark_mode.then_some("tema-escuro")] {
                header {
                    strong { "CRM " (chrome.agent_name) }
                    nav {
                        @for tab in Tab::ALL {
                            a href=(tab.path()) class=[(tab == chrome.tab).then_some("ativo")] {
                                (tab.label())
                            }
                        }
                    }
                    form.inline method="post" action="/tema" {
                        input type="hidden" name="voltar" value=(chrome.tab.path());
                        button type="submit" {
                            @if chrome.dark_mode { "Tema claro" } @else { "Tema escuro" }
                        }
                    }
                }
                main {
                    @if let Some(notice) = &chrome.notice {
                        (notice_banner(notice))
                    }
                    (body)
                }
                @if chrome.live {
                    script { (PreEscaped(LIVE_RELOAD)) }
                }
            }
        }
    }
}
