//! Tipos de dados para a API de integração POS da Wolt.
//!
//! Modela as duas direções do fluxo: as respostas do job assíncrono de menu
//! (submissão e polling) e o payload de atualização de itens enviado no
//! restock. Campos que o serviço pode omitir são `Option` com
//! `#[serde(default)]` para tolerar variações de schema.

use serde::{Deserialize, Serialize};

/// Status que o documento de menu reporta quando o job terminou.
pub const MENU_STATUS_READY: &str = "READY";

/// Resposta da submissão do job de menu (HTTP 202).
///
/// O único campo relevante é o `resource_url`, a URL pré-autorizada onde o
/// documento ficará disponível quando o job terminar.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuJobResponse {
    /// URL do recurso a ser consultada via polling.
    #[serde(default)]
    pub resource_url: Option<String>,
}

/// Documento de menu retornado pelo polling do `resource_url`.
///
/// Enquanto o job roda, `status` carrega um valor transitório e `menu` pode
/// vir vazio. Só um documento com status [`MENU_STATUS_READY`] é utilizável.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuDocument {
    /// Estado do job ("READY" quando concluído).
    #[serde(default)]
    pub status: String,

    /// Conteúdo do menu, presente quando o job concluiu.
    #[serde(default)]
    pub menu: Option<MenuPayload>,

    /// Venue dona do documento, anotada localmente antes do arquivamento.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub venue_id: Option<String>,
}

impl MenuDocument {
    /// Se o job terminou e o documento pode ser consumido.
    pub fn is_ready(&self) -> bool {
        self.status == MENU_STATUS_READY
    }

    /// Converte o documento pronto no snapshot consumido pelo filtro.
    /// Um documento sem `menu` vira um snapshot sem itens.
    pub fn into_snapshot(self, venue_id: String) -> MenuSnapshot {
        MenuSnapshot {
            venue_id,
            items: self.menu.map(|menu| menu.items).unwrap_or_default(),
        }
    }
}

/// Corpo do menu: a lista de itens da venue.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MenuPayload {
    #[serde(default)]
    pub items: Vec<MenuItem>,
}

/// Um item do menu como o serviço o descreve.
///
/// Todos os campos são opcionais: o schema upstream evolui e itens
/// incompletos não podem derrubar o parse do documento inteiro.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MenuItem {
    /// Identificador interno do item no serviço POS.
    #[serde(default)]
    pub id: Option<String>,

    /// Modo de inventário ("FORCED_OUT_OF_STOCK" marca retirada manual).
    #[serde(default)]
    pub inventory_mode: Option<String>,

    /// Flag genérica de esgotado; informativa, não dispara restock.
    #[serde(default)]
    pub sold_out: Option<bool>,

    /// Identificadores de produto (gtin e sku).
    #[serde(default)]
    pub product: Option<ProductIds>,
}

/// Identificadores de produto de um item de menu.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductIds {
    #[serde(default)]
    pub gtin: Option<String>,

    #[serde(default)]
    pub sku: Option<String>,
}

/// Menu pronto de uma venue, achatado para consumo do filtro.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuSnapshot {
    pub venue_id: String,
    pub items: Vec<MenuItem>,
}

/// Payload do PATCH de atualização de itens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemsUpdate {
    pub data: Vec<ItemUpdate>,
}

/// Uma entrada do payload de atualização: exatamente um identificador
/// (gtin ou sku) e a flag `in_stock`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gtin: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,

    pub in_stock: bool,
}

impl ItemUpdate {
    /// Entrada endereçada por gtin, marcada de volta em estoque.
    pub fn gtin(id: impl Into<String>) -> Self {
        Self {
            gtin: Some(id.into()),
            sku: None,
            in_stock: true,
        }
    }

    /// Entrada endereçada por sku, marcada de volta em estoque.
    pub fn sku(id: impl Into<String>) -> Self {
        Self {
            gtin: None,
            sku: Some(id.into()),
            in_stock: true,
        }
    }
}
