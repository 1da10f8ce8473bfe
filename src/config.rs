//! Configuração do restocker carregada a partir de `restocker.toml`.
//!
//! A struct [`Settings`] contém todos os parâmetros configuráveis do ciclo.
//! Valores não presentes no arquivo usam defaults sensíveis. A variável de
//! ambiente `RESTOCKER_BASE_URL` tem precedência sobre o arquivo, o que
//! permite apontar para um ambiente de staging sem editar nada.
//!
//! As credenciais ficam em um arquivo separado (`venues.json`), uma entrada
//! [`VenueConfig`] por venue, no mesmo formato que o serviço de deploy injeta.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::backoff::{DEFAULT_WAIT_SECS, WAIT_INCREMENT_SECS};
use crate::error::RestockerError;
use crate::filter::FilterPolicy;
use crate::pos::client::API_BASE_URL;

/// Configuração de nível superior carregada de `restocker.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// URL base do serviço de integração POS.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Caminho do arquivo JSON com as venues e credenciais.
    #[serde(default = "default_venues_file")]
    pub venues_file: PathBuf,

    /// Caminho do arquivo onde as esperas aprendidas são persistidas.
    #[serde(default = "default_backoff_file")]
    pub backoff_file: PathBuf,

    /// Espera inicial em segundos antes do primeiro poll de uma venue.
    #[serde(default = "default_wait_secs")]
    pub default_wait_secs: u64,

    /// Segundos somados à espera aprendida a cada falha de fetch.
    #[serde(default = "default_wait_increment_secs")]
    pub wait_increment_secs: u64,

    /// Tentativas de poll antes de desistir de um job de menu.
    #[serde(default = "default_poll_attempts")]
    pub poll_attempts: u32,

    /// Intervalo fixo em segundos entre tentativas de poll.
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,

    /// Pausa em segundos entre venues consecutivas.
    #[serde(default = "default_venue_delay_secs")]
    pub venue_delay_secs: u64,

    /// Diretório onde menus prontos são arquivados; desligado se ausente.
    #[serde(default)]
    pub snapshot_dir: Option<PathBuf>,
}

// Valor padrão para a URL base: o serviço de produção.
fn default_base_url() -> String {
    API_BASE_URL.to_string()
}

// Valor padrão para o arquivo de venues: "venues.json".
fn default_venues_file() -> PathBuf {
    PathBuf::from("venues.json")
}

// Valor padrão para o arquivo de esperas: "/tmp/restocker_backoff.json".
fn default_backoff_file() -> PathBuf {
    PathBuf::from("/tmp/restocker_backoff.json")
}

// Valor padrão para a espera inicial: 30s.
fn default_wait_secs() -> u64 {
    DEFAULT_WAIT_SECS
}

// Valor padrão para o incremento de espera: 5s.
fn default_wait_increment_secs() -> u64 {
    WAIT_INCREMENT_SECS
}

// Valor padrão para tentativas de poll: 8.
fn default_poll_attempts() -> u32 {
    8
}

// Valor padrão para o intervalo de poll: 6s.
fn default_poll_interval_secs() -> u64 {
    6
}

// Valor padrão para a pausa entre venues: 10s.
fn default_venue_delay_secs() -> u64 {
    10
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            venues_file: default_venues_file(),
            backoff_file: default_backoff_file(),
            default_wait_secs: default_wait_secs(),
            wait_increment_secs: default_wait_increment_secs(),
            poll_attempts: default_poll_attempts(),
            poll_interval_secs: default_poll_interval_secs(),
            venue_delay_secs: default_venue_delay_secs(),
            snapshot_dir: None,
        }
    }
}

impl Settings {
    /// Carrega a configuração de `restocker.toml` no diretório atual.
    /// Usa valores padrão se o arquivo não existir.
    pub fn load() -> Result<Self, RestockerError> {
        Self::load_from(Path::new("restocker.toml"))
    }

    /// Carrega a configuração de um caminho específico.
    pub fn load_from(path: &Path) -> Result<Self, RestockerError> {
        let mut settings = if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            toml::from_str::<Settings>(&contents)?
        } else {
            Self::default()
        };

        // Variável de ambiente tem precedência sobre o arquivo para a URL base.
        if let Ok(url) = std::env::var("RESTOCKER_BASE_URL")
            && !url.is_empty()
        {
            settings.base_url = url;
        }

        Ok(settings)
    }
}

/// Uma venue Wolt com suas credenciais e listas de controle do filtro.
///
/// As quatro listas são opcionais no arquivo; ausentes viram vazias.
#[derive(Debug, Clone, Deserialize)]
pub struct VenueConfig {
    /// Identificador da venue no serviço POS.
    pub venue_id: String,

    /// Usuário da autenticação básica da API.
    pub api_username: String,

    /// Senha da autenticação básica da API.
    pub api_password: String,

    /// GTINs que nunca devem voltar ao estoque automaticamente.
    #[serde(default)]
    pub excluded_gtins: Vec<String>,

    /// SKUs que nunca devem voltar ao estoque automaticamente.
    #[serde(default)]
    pub excluded_skus: Vec<String>,

    /// Se não vazio (junto com `included_skus`), restringe o restock a
    /// estes GTINs.
    #[serde(default)]
    pub included_gtins: Vec<String>,

    /// Se não vazio (junto com `included_gtins`), restringe o restock a
    /// estes SKUs.
    #[serde(default)]
    pub included_skus: Vec<String>,
}

impl VenueConfig {
    /// Monta a política de filtro desta venue a partir das quatro listas.
    pub fn filter_policy(&self) -> FilterPolicy {
        FilterPolicy::new(
            self.excluded_gtins.clone(),
            self.excluded_skus.clone(),
            self.included_gtins.clone(),
            self.included_skus.clone(),
        )
    }
}

/// Carrega a lista de venues de um arquivo JSON.
pub fn load_venues(path: &Path) -> Result<Vec<VenueConfig>, RestockerError> {
    let contents = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

/// Restringe a lista carregada às venues pedidas na linha de comando.
///
/// Com `venue_ids` vazio a lista passa inteira, na ordem do arquivo. Um id
/// desconhecido é [`RestockerError::VenueNotFound`]; terminar sem nenhuma
/// venue é [`RestockerError::NoVenues`].
pub fn select_venues(
    mut venues: Vec<VenueConfig>,
    venue_ids: &[String],
    venues_path: &Path,
) -> Result<Vec<VenueConfig>, RestockerError> {
    if !venue_ids.is_empty() {
        for id in venue_ids {
            if !venues.iter().any(|venue| venue.venue_id == *id) {
                return Err(RestockerError::VenueNotFound(id.clone()));
            }
        }
        venues.retain(|venue| venue_ids.contains(&venue.venue_id));
    }
    if venues.is_empty() {
        return Err(RestockerError::NoVenues(venues_path.to_path_buf()));
    }
    Ok(venues)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn venue(id: &str) -> VenueConfig {
        VenueConfig {
            venue_id: id.to_string(),
            api_username: "u".to_string(),
            api_password: "p".to_string(),
            excluded_gtins: Vec::new(),
            excluded_skus: Vec::new(),
            included_gtins: Vec::new(),
            included_skus: Vec::new(),
        }
    }

    #[test]
    fn default_config_values() {
        let settings = Settings::default();
        assert_eq!(settings.base_url, "https://pos-integration-service.wolt.com");
        assert_eq!(settings.venues_file, PathBuf::from("venues.json"));
        assert_eq!(settings.default_wait_secs, 30);
        assert_eq!(settings.wait_increment_secs, 5);
        assert_eq!(settings.poll_attempts, 8);
        assert_eq!(settings.poll_interval_secs, 6);
        assert_eq!(settings.venue_delay_secs, 10);
        assert!(settings.snapshot_dir.is_none());
    }

    #[test]
    fn deserialize_partial_toml() {
        let toml_str = r#"
            base_url = "https://staging.example.com"
            poll_attempts = 3
        "#;
        let settings: Settings = toml::from_str(toml_str).unwrap();
        assert_eq!(settings.base_url, "https://staging.example.com");
        assert_eq!(settings.poll_attempts, 3);
        assert_eq!(settings.poll_interval_secs, 6);
        assert_eq!(settings.default_wait_secs, 30);
    }

    #[test]
    fn load_from_missing_file_falls_back_to_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let settings = Settings::load_from(&dir.path().join("restocker.toml")).unwrap();
        assert_eq!(settings.poll_attempts, 8);
    }

    #[test]
    fn venues_parse_with_all_lists() {
        let json = r#"[
            {
                "venue_id": "venue-1",
                "api_username": "user",
                "api_password": "pass",
                "excluded_gtins": ["111"],
                "excluded_skus": ["S-1"],
                "included_gtins": ["222"],
                "included_skus": []
            }
        ]"#;
        let venues: Vec<VenueConfig> = serde_json::from_str(json).unwrap();
        assert_eq!(venues.len(), 1);
        assert_eq!(venues[0].venue_id, "venue-1");
        assert_eq!(venues[0].excluded_gtins, vec!["111"]);
        assert_eq!(venues[0].included_gtins, vec!["222"]);
    }

    #[test]
    fn venue_lists_default_to_empty() {
        let json = r#"{"venue_id": "venue-1", "api_username": "u", "api_password": "p"}"#;
        let venue: VenueConfig = serde_json::from_str(json).unwrap();
        assert!(venue.excluded_gtins.is_empty());
        assert!(venue.excluded_skus.is_empty());
        assert!(venue.included_gtins.is_empty());
        assert!(venue.included_skus.is_empty());
    }

    #[test]
    fn load_venues_reads_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("venues.json");
        std::fs::write(
            &path,
            r#"[{"venue_id": "v1", "api_username": "u", "api_password": "p"}]"#,
        )
        .unwrap();

        let venues = load_venues(&path).unwrap();
        assert_eq!(venues.len(), 1);
        assert_eq!(venues[0].venue_id, "v1");
    }

    #[test]
    fn load_venues_missing_file_is_an_io_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = load_venues(&dir.path().join("venues.json")).unwrap_err();
        assert!(matches!(err, RestockerError::Io(_)));
    }

    #[test]
    fn load_venues_rejects_malformed_json() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("venues.json");
        std::fs::write(&path, "[{").unwrap();
        let err = load_venues(&path).unwrap_err();
        assert!(matches!(err, RestockerError::Json(_)));
    }

    #[test]
    fn select_venues_passes_full_list_through() {
        let venues = vec![venue("v1"), venue("v2")];
        let selected = select_venues(venues, &[], Path::new("venues.json")).unwrap();
        assert_eq!(selected.len(), 2);
    }

    #[test]
    fn select_venues_keeps_only_requested_ids() {
        let venues = vec![venue("v1"), venue("v2"), venue("v3")];
        let ids = vec!["v3".to_string(), "v1".to_string()];
        let selected = select_venues(venues, &ids, Path::new("venues.json")).unwrap();
        let kept: Vec<_> = selected.iter().map(|v| v.venue_id.as_str()).collect();
        // A ordem do arquivo é preservada, não a ordem dos argumentos.
        assert_eq!(kept, vec!["v1", "v3"]);
    }

    #[test]
    fn select_venues_rejects_unknown_id() {
        let venues = vec![venue("v1")];
        let ids = vec!["v9".to_string()];
        let err = select_venues(venues, &ids, Path::new("venues.json")).unwrap_err();
        match err {
            RestockerError::VenueNotFound(id) => assert_eq!(id, "v9"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn select_venues_rejects_empty_list() {
        let err = select_venues(Vec::new(), &[], Path::new("venues.json")).unwrap_err();
        assert!(matches!(err, RestockerError::NoVenues(_)));
        assert!(err.to_string().contains("venues.json"));
    }

    #[test]
    fn filter_policy_mirrors_venue_lists() {
        let venue = VenueConfig {
            venue_id: "v1".to_string(),
            api_username: "u".to_string(),
            api_password: "p".to_string(),
            excluded_gtins: vec!["111".to_string()],
            excluded_skus: Vec::new(),
            included_gtins: Vec::new(),
            included_skus: vec!["S-1".to_string()],
        };
        let policy = venue.filter_policy();
        assert_eq!(
            policy,
            FilterPolicy::new(
                vec!["111".to_string()],
                Vec::new(),
                Vec::new(),
                vec!["S-1".to_string()],
            )
        );
    }
}
