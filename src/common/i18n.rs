// src/common/i18n.rs

use std::collections::HashMap;
use std::sync::Arc;

const DEFAULT_LANG: &str = "en";

// Catálogos embutidos no binário. Cada arquivo é um objeto plano { chave: texto }.
const CATALOGS: &[(&str, &str)] = &[
    ("en", include_str!("../../locales/en.json")),
    ("th", include_str!("../../locales/th.json")),
];

/// Mensagens traduzidas por idioma. Clonar é barato (Arc).
#[derive(Clone, Debug)]
pub struct I18nStore {
    catalogs: Arc<HashMap<String, HashMap<String, String>>>,
}

impl I18nStore {
    pub fn load() -> anyhow::Result<Self> {
        let mut catalogs = HashMap::new();
        for (lang, raw) in CATALOGS {
            let messages: HashMap<String, String> = serde_json::from_str(raw)
                .map_err(|e| anyhow::anyhow!("Catálogo '{}' inválido: {}", lang, e))?;
            catalogs.insert(lang.to_string(), messages);
        }
        tracing::info!("🌐 {} catálogos de idioma carregados", catalogs.len());
        Ok(Self {
            catalogs: Arc::new(catalogs),
        })
    }

    /// Busca `key` no idioma pedido, depois no padrão e por fim devolve a própria chave.
    /// Os argumentos substituem marcadores `{nome}`.
    pub fn translate(&self, lang: &str, key: &str, args: &[(&str, &str)]) -> String {
        let template = self
            .catalogs
            .get(lang)
            .and_then(|c| c.get(key))
            .or_else(|| self.catalogs.get(DEFAULT_LANG).and_then(|c| c.get(key)))
            .map(String::as_str)
            .unwrap_or(key);

        args.iter().fold(template.to_string(), |acc, (name, value)| {
            acc.replace(&format!("{{{}}}", name), value)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn falls_back_to_english_then_to_key() {
        let store = I18nStore::load().unwrap();
        assert_eq!(store.translate("fr", "invalid_json", &[]), "Invalid JSON");
        assert_eq!(store.translate("th", "no_such_key", &[]), "no_such_key");
    }

    #[test]
    fn substitutes_arguments() {
        let store = I18nStore::load().unwrap();
        let msg = store.translate("en", "not_found", &[("what", "machine 3")]);
        assert!(msg.contains("machine 3"));
        assert!(!msg.contains("{what}"));
    }

    #[test]
    fn every_thai_key_exists_in_english() {
        let store = I18nStore::load().unwrap();
        let en = &store.catalogs["en"];
        for key in store.catalogs["th"].keys() {
            assert!(en.contains_key(key), "chave sem tradução em inglês: {key}");
        }
    }
}
