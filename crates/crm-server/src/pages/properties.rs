// File: crm-server/src/pages/properties.rs
// Purpose: Property catalogue with search and filters

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Response,
    Form,
};
use crm_core::format::format_price_brl;
use crm_core::view::{filter_properties, CategoryFilter, PriceBand, PropertyFilter};
use crm_core::{Category, PropertyForm, RecordId, Snapshot, ValidationErrors};
use crm_sync::CommandError;
use maud::{html, Markup};
use serde::Deserialize;

use super::layout::{page, Chrome, Tab};
use super::{describe, field_error, flash, render, see_other, status_for};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct PropertiesQuery {
    pub q: Option<String>,
    pub tipo: Option<String>,
    pub faixa: Option<String>,
    pub aviso: Option<String>,
}

impl PropertiesQuery {
    fn filter(&self) -> PropertyFilter {
        PropertyFilter::from_params(
            self.q.as_deref(),
            self.tipo.as_deref(),
            self.faixa.as_deref(),
        )
    }
}

pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<PropertiesQuery>,
) -> Response {
    let chrome = Chrome::new(&state, Tab::Properties).with_notice(flash(query.aviso.as_deref()));
    let snapshot = state.store.snapshot().await;

    render(
        StatusCode::OK,
        page(
            &chrome,
            properties_body(&snapshot, &query.filter(), &PropertyForm::default(), None),
        ),
    )
}

pub async fn create(State(state): State<AppState>, Form(form): Form<PropertyForm>) -> Response {
    match state.commands.add_property(&form).await {
        Ok(_) => see_other("/imoveis?aviso=imovel-adicionado"),
        Err(error) => failed(&state, error, form).await,
    }
}

pub async fn remove(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match state.commands.remove_property(&RecordId::new(id)).await {
        Ok(()) => see_other("/imoveis?aviso=imovel-removido"),
        Err(error) => failed(&state, error, PropertyForm::default()).await,
    }
}

async fn failed(state: &AppState, error: CommandError, form: PropertyForm) -> Response {
    let status = status_for(&error);
    let (errors, notice) = describe(error);
    let chrome = Chrome::new(state, Tab::Properties).after_failed_submit(notice);
    let snapshot = state.store.snapshot().await;

    render(
        status,
        page(
            &chrome,
            properties_body(&snapshot, &PropertyFilter::default(), &form, errors.as_ref()),
        ),
    )
}

fn filter_form(filter: &PropertyFilter) -> Markup {
    html! {
        form.filtros method="get" action="/imoveis" {
            input type="search" name="q" value=(filter.query)
                placeholder="Buscar por título, endereço ou valor";
            select name="tipo" {
                option value=(CategoryFilter::ALL_PARAM)
                    selected[filter.category == CategoryFilter::All] {
                    "Todos os Tipos"
                }
                @for category in Category::ALL {
                    option value=(category.label())
                        selected[filter.category == CategoryFilter::Only(category)] {
                        (category.label())
                    }
                }
            }
            select name="faixa" {
                @for band in PriceBand::ALL {
                    option value=(band.param()) selected[filter.price == band] { (band.label()) }
                }
            }
            button type="submit" { "Filtrar" }
            @if filter.is_active() {
                " "
                a href="/imoveis" { "Limpar filtros" }
            }
        }
    }
}

fn property_form(form: &PropertyForm, errors: Option<&ValidationErrors>) -> Markup {
    html! {
        form.cartao method="post" action="/imoveis" {
            h2 { "Novo imóvel" }
            label {
                "Título"
                input type="text" name="titulo" value=(form.titulo) required;
            }
            (field_error(errors, "titulo"))
            label {
                "Endereço"
                input type="text" name="endereco" value=(form.endereco) required;
            }
            (field_error(errors, "endereco"))
            label {
                "Valor (R$)"
                input type="text" inputmode="decimal" name="valor" value=(form.valor);
            }
            (field_error(errors, "valor"))
            label {
                "Tipo"
                select name="tipo" {
                    @for category in Category::ALL {
                        option value=(category.label()) selected[form.tipo == category.label()] {
                            (category.label())
                        }
                    }
                }
            }
            (field_error(errors, "tipo"))
            label {
                "Link do anúncio"
                input type="url" name="link_externo" value=(form.link_externo);
            }
            (field_error(errors, "link_externo"))
            label {
                "URL da foto"
                input type="url" name="url_foto" value=(form.url_foto);
            }
            (field_error(errors, "url_foto"))
            button type="submit" { "Adicionar imóvel" }
        }
    }
}

fn properties_body(
    snapshot: &Snapshot,
    filter: &PropertyFilter,
    form: &PropertyForm,
    errors: Option<&ValidationErrors>,
) -> Markup {
    let visible = filter_properties(&snapshot.properties, filter);

    html! {
        h1 { "Imóveis" }

        (property_form(form, errors))
        (filter_form(filter))

        p { (visible.len()) " de " (snapshot.properties.len()) " imóveis" }

        section.cartoes {
            @for property in &visible {
                article.cartao {
                    @if let Some(photo) = &property.photo_url {
                        img src=(photo) alt=(property.title) width="100%" loading="lazy";
                    }
                    h3 { (property.title) }
                    p { (property.address) }
                    p {
                        strong { (format_price_brl(property.price)) }
                        " · " (property.category.label())
                    }
                    nav {
                        @if let Some(listing) = &property.listing_url {
                            a href=(listing) target="_blank" rel="noopener" { "Ver anúncio" } " "
                        }
                        form.inline method="post"
                            action={ "/imoveis/" (property.id.as_str()) "/excluir" } {
                            button type="submit" { "Remover" }
                        }
                    }
                }
            }
        }

        @if visible.is_empty() {
            @if filter.is_active() {
                p { "Nenhum imóvel corresponde aos filtros." }
            } @else {
                p { "Nenhum imóvel cadastrado." }
            }
        }
    }
}
