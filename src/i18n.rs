//! English/Portuguese text selection for the shell and its notices.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::common::error::{ImportError, InjectionError, TabError};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Pt,
}

impl Language {
    /// Pick the text matching this language.
    pub fn translate<'a>(self, en: &'a str, pt: &'a str) -> &'a str {
        match self {
            Language::En => en,
            Language::Pt => pt,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Pt => "pt",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Pt => "Português",
        }
    }

    pub fn all() -> [Language; 2] {
        [Language::En, Language::Pt]
    }
}

/// A localized title/message pair shown to the user.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct Notice {
    pub title: String,
    pub message: String,
}

impl Notice {
    fn new(title: &str, message: impl Into<String>) -> Self {
        Self {
            title: title.to_string(),
            message: message.into(),
        }
    }
}

const UI_STRINGS: &[(&str, &str, &str)] = &[
    ("back", "Back", "Voltar"),
    ("forward", "Forward", "Avançar"),
    ("reload", "Reload", "Recarregar"),
    ("new_tab", "New Tab", "Nova Aba"),
    ("extensions", "Extensions", "Extensões"),
    ("settings", "Settings", "Configurações"),
    ("manage_extensions", "Manage Extensions", "Gerenciar Extensões"),
    ("add_extension", "Add Extension", "Adicionar Extensão"),
    ("remove_selected", "Remove Selected", "Remover Selecionada"),
    ("toggle_extension", "Toggle Enabled/Disabled", "Ativar/Desativar"),
    ("move_up", "Move Up", "Mover para Cima"),
    ("move_down", "Move Down", "Mover para Baixo"),
    ("enabled", "Enabled", "Ativada"),
    ("disabled", "Disabled", "Desativada"),
    ("select_extension", "Select Extension", "Selecionar Extensão"),
    ("json_files", "JSON Files", "Arquivos JSON"),
    ("language", "Language:", "Idioma:"),
    ("save", "Save", "Salvar"),
    ("warning", "Warning", "Aviso"),
    ("error", "Error", "Erro"),
    ("download_started", "Downloading", "Baixando"),
    ("download_finished", "Download finished", "Download concluído"),
    ("download_failed", "Download failed", "Falha no download"),
    ("show_in_folder", "Show in Folder", "Mostrar na Pasta"),
];

/// Toolbar and dialog labels keyed by identifier.
pub fn ui_strings(language: Language) -> BTreeMap<&'static str, &'static str> {
    UI_STRINGS
        .iter()
        .map(|(key, en, pt)| (*key, language.translate(en, pt)))
        .collect()
}

pub fn ui_string(language: Language, key: &str) -> Option<&'static str> {
    UI_STRINGS
        .iter()
        .find(|(k, _, _)| *k == key)
        .map(|(_, en, pt)| language.translate(en, pt))
}

pub fn import_error_notice(error: &ImportError, language: Language) -> Notice {
    let t = |en, pt| language.translate(en, pt);
    match error {
        ImportError::MissingFields(_) | ImportError::InvalidField { .. } => Notice::new(
            t("Invalid Extension", "Extensão Inválida"),
            format!(
                "{} ({})",
                t(
                    "The selected file is not a valid extension.",
                    "O arquivo selecionado não é uma extensão válida."
                ),
                error
            ),
        ),
        ImportError::ScriptPathInvalid(_) => Notice::new(
            t("Invalid Script Path", "Caminho do Script Inválido"),
            t(
                "The script file path is invalid.",
                "O caminho do arquivo do script é inválido.",
            ),
        ),
        ImportError::NotJson(_) => Notice::new(
            t("Error", "Erro"),
            t("The file is not a valid JSON.", "O arquivo não é um JSON válido."),
        ),
        ImportError::Io(_) | ImportError::Store(_) => Notice::new(
            t("Error", "Erro"),
            format!(
                "{}: {}",
                t(
                    "Failed to load extension",
                    "Falha ao carregar a extensão"
                ),
                error
            ),
        ),
    }
}

pub fn injection_error_notice(name: &str, error: &InjectionError, language: Language) -> Notice {
    let message = match language {
        Language::En => format!("Failed to inject script '{}': {}", name, error),
        Language::Pt => format!("Falha ao injetar o script '{}': {}", name, error),
    };
    Notice::new(language.translate("Error", "Erro"), message)
}

pub fn tab_error_notice(error: &TabError, language: Language) -> Notice {
    match error {
        TabError::LastTab => Notice::new(
            language.translate("Warning", "Aviso"),
            language.translate(
                "Cannot close the last tab.",
                "Não é possível fechar a última aba.",
            ),
        ),
        other => Notice::new(language.translate("Error", "Erro"), other.to_string()),
    }
}

pub fn settings_saved_notice(language: Language) -> Notice {
    Notice::new(
        language.translate("Settings", "Configurações"),
        language.translate(
            "Settings saved. Restart the browser to apply changes.",
            "Configurações salvas. Reinicie o navegador para aplicar as alterações.",
        ),
    )
}
