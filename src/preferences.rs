// src/preferences.rs
//
// Préférences persistantes : un document JSON unique, relu au lancement,
// réécrit en entier après chaque modification.
//
// Contrats :
// - Document toujours complet : clé absente ou invalide => défaut de cette clé.
// - Fichier absent / illisible / JSON invalide / racine non-objet => tout par défaut.
// - Une sauvegarde ratée est journalisée, jamais fatale.
// - `mappings` est un objet JSON dont l’ordre des clés est l’ordre de substitution.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use serde::de::{DeserializeOwned, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use thiserror::Error;

/// Nom du fichier, relatif au répertoire de travail.
pub const FICHIER_DEFAUT: &str = "customizations.txt";

/// Variable d’environnement qui remplace le chemin par défaut.
pub const VAR_CHEMIN: &str = "CALCULATRICE_PREFERENCES";

/// Correspondances installées quand le document n’a pas de clé `mappings`.
const CORRESPONDANCES_DEFAUT: [(&str, &str); 3] = [
    ("arcsin", "asin"),
    ("arccos", "acos"),
    ("arctan", "atan"),
];

#[derive(Debug, Error)]
pub enum ErreurPreferences {
    #[error("accès fichier impossible: {0}")]
    Io(#[from] io::Error),

    #[error("sérialisation JSON impossible: {0}")]
    Json(#[from] serde_json::Error),

    #[error("remplacement du fichier impossible: {0}")]
    Persistance(#[source] io::Error),
}

/* ------------------------ Langue ------------------------ */

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Langue {
    #[default]
    #[serde(rename = "en")]
    En,
    #[serde(rename = "zh")]
    Zh,
}

impl Langue {
    pub const TOUTES: [Langue; 2] = [Langue::En, Langue::Zh];
}

/* ------------------------ Table de correspondances ------------------------ */

/// Paires (alias, remplacement) ordonnées ; un alias apparaît au plus une fois.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableCorrespondances {
    paires: Vec<(String, String)>,
}

impl Default for TableCorrespondances {
    fn default() -> Self {
        Self::par_defaut()
    }
}

impl TableCorrespondances {
    pub fn vide() -> Self {
        Self { paires: Vec::new() }
    }

    pub fn par_defaut() -> Self {
        let mut t = Self::vide();
        for (a, r) in CORRESPONDANCES_DEFAUT {
            t.inserer(a, r);
        }
        t
    }

    /// Alias existant : remplacement mis à jour sur place (la position ne change pas).
    /// Nouvel alias : ajouté en fin de table.
    pub fn inserer(&mut self, alias: impl Into<String>, remplacement: impl Into<String>) {
        let alias = alias.into();
        let remplacement = remplacement.into();
        match self.paires.iter_mut().find(|(a, _)| *a == alias) {
            Some((_, r)) => *r = remplacement,
            None => self.paires.push((alias, remplacement)),
        }
    }

    pub fn retirer(&mut self, alias: &str) -> bool {
        let avant = self.paires.len();
        self.paires.retain(|(a, _)| a != alias);
        self.paires.len() != avant
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.paires.iter().map(|(a, r)| (a.as_str(), r.as_str()))
    }

    pub fn len(&self) -> usize {
        self.paires.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paires.is_empty()
    }
}

impl Serialize for TableCorrespondances {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.paires.len()))?;
        for (a, r) in &self.paires {
            map.serialize_entry(a, r)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for TableCorrespondances {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct VisiteurTable;

        impl<'de> Visitor<'de> for VisiteurTable {
            type Value = TableCorrespondances;

            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                f.write_str("un objet alias -> remplacement")
            }

            fn visit_map<M: MapAccess<'de>>(self, mut acces: M) -> Result<Self::Value, M::Error> {
                let mut table = TableCorrespondances::vide();
                while let Some((alias, remplacement)) = acces.next_entry::<String, String>()? {
                    table.inserer(alias, remplacement);
                }
                Ok(table)
            }
        }

        deserializer.deserialize_map(VisiteurTable)
    }
}

/* ------------------------ Notes ------------------------ */

/// Résultat enregistré (ou note saisie à la main). Immuable une fois créé.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    #[serde(default)]
    pub name: String,

    #[serde(rename = "type", default)]
    pub genre: String,

    #[serde(default)]
    pub value: String,

    /// Absent pour une note ajoutée à la main.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "entree_optionnelle"
    )]
    pub input: Option<String>,
}

fn entree_optionnelle<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    let brut = Option::<String>::deserialize(d)?;
    Ok(brut.filter(|s| !s.is_empty()))
}

/* ------------------------ Document ------------------------ */

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Preferences {
    #[serde(rename = "language")]
    pub langue: Langue,

    /// Identifiant de bouton -> libellé remplaçant.
    pub labels: BTreeMap<String, String>,

    #[serde(rename = "mappings")]
    pub correspondances: TableCorrespondances,

    pub dark_mode: bool,

    pub notes: Vec<Note>,
}

impl Preferences {
    /// Document complet à partir d’une valeur JSON quelconque.
    pub fn depuis_valeur(valeur: Value) -> Self {
        let Value::Object(mut obj) = valeur else {
            warn!("préférences: la racine n’est pas un objet, valeurs par défaut");
            return Self::default();
        };

        Self {
            langue: champ(&mut obj, "language"),
            labels: champ(&mut obj, "labels"),
            correspondances: champ(&mut obj, "mappings"),
            dark_mode: champ(&mut obj, "dark_mode"),
            notes: champ(&mut obj, "notes"),
        }
    }

    pub fn depuis_texte(texte: &str) -> Self {
        match serde_json::from_str::<Value>(texte) {
            Ok(v) => Self::depuis_valeur(v),
            Err(e) => {
                warn!("préférences: JSON invalide ({e}), valeurs par défaut");
                Self::default()
            }
        }
    }

    /// JSON indenté de 4 espaces, caractères non ASCII tels quels.
    pub fn vers_json(&self) -> Result<Vec<u8>, ErreurPreferences> {
        let mut buf = Vec::new();
        let formateur = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formateur);
        self.serialize(&mut ser)?;
        Ok(buf)
    }
}

/// Lit une clé ; absente ou mal typée => défaut de la clé.
fn champ<T: DeserializeOwned + Default>(obj: &mut Map<String, Value>, cle: &str) -> T {
    let Some(v) = obj.remove(cle) else {
        debug!("préférences: clé '{cle}' absente, défaut");
        return T::default();
    };
    serde_json::from_value(v).unwrap_or_else(|e| {
        warn!("préférences: clé '{cle}' invalide ({e}), défaut");
        T::default()
    })
}

/* ------------------------ Store ------------------------ */

/// Document en mémoire + chemin du fichier. Chaque mutateur persiste aussitôt.
#[derive(Debug)]
pub struct StorePreferences {
    chemin: PathBuf,
    doc: Preferences,
}

impl StorePreferences {
    /// `CALCULATRICE_PREFERENCES` si défini, sinon `customizations.txt`.
    pub fn chemin_par_defaut() -> PathBuf {
        std::env::var_os(VAR_CHEMIN)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(FICHIER_DEFAUT))
    }

    /// Charge le document ; n’échoue jamais (repli sur les défauts).
    pub fn charger(chemin: impl Into<PathBuf>) -> Self {
        let chemin = chemin.into();
        let doc = match fs::read_to_string(&chemin) {
            Ok(texte) => Preferences::depuis_texte(&texte),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                info!("préférences: {} absent, valeurs par défaut", chemin.display());
                Preferences::default()
            }
            Err(e) => {
                warn!("préférences: lecture de {} impossible ({e})", chemin.display());
                Preferences::default()
            }
        };
        Self { chemin, doc }
    }

    pub fn doc(&self) -> &Preferences {
        &self.doc
    }

    pub fn chemin(&self) -> &Path {
        &self.chemin
    }

    /// Réécrit le fichier entier (écriture atomique en natif).
    #[cfg(not(target_arch = "wasm32"))]
    pub fn sauvegarder(&self) -> Result<(), ErreurPreferences> {
        use std::io::Write;

        let octets = self.doc.vers_json()?;
        let parent = match self.chemin.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent)?;

        let mut tmp = tempfile::NamedTempFile::new_in(parent)?;
        tmp.write_all(&octets)?;
        tmp.persist(&self.chemin)
            .map_err(|e| ErreurPreferences::Persistance(e.error))?;
        Ok(())
    }

    #[cfg(target_arch = "wasm32")]
    pub fn sauvegarder(&self) -> Result<(), ErreurPreferences> {
        let octets = self.doc.vers_json()?;
        fs::write(&self.chemin, octets)?;
        Ok(())
    }

    fn persister(&self) {
        match self.sauvegarder() {
            Ok(()) => debug!("préférences: {} écrit", self.chemin.display()),
            Err(e) => warn!("préférences: sauvegarde ratée ({e})"),
        }
    }

    /* ------------------------ Mutateurs ------------------------ */

    pub fn set_langue(&mut self, langue: Langue) {
        self.doc.langue = langue;
        self.persister();
    }

    pub fn set_dark_mode(&mut self, actif: bool) {
        self.doc.dark_mode = actif;
        self.persister();
    }

    /// Libellé vide => retour au libellé d’origine (entrée supprimée).
    pub fn set_label(&mut self, bouton: &str, libelle: &str) {
        if libelle.is_empty() {
            self.doc.labels.remove(bouton);
        } else {
            self.doc
                .labels
                .insert(bouton.to_string(), libelle.to_string());
        }
        self.persister();
    }

    pub fn reset_labels(&mut self) {
        self.doc.labels.clear();
        self.persister();
    }

    pub fn ajouter_correspondance(&mut self, alias: &str, remplacement: &str) {
        self.doc.correspondances.inserer(alias, remplacement);
        self.persister();
    }

    pub fn retirer_correspondance(&mut self, alias: &str) -> bool {
        let retire = self.doc.correspondances.retirer(alias);
        if retire {
            self.persister();
        }
        retire
    }

    pub fn reset_correspondances(&mut self) {
        self.doc.correspondances = TableCorrespondances::par_defaut();
        self.persister();
    }

    pub fn ajouter_note(&mut self, note: Note) {
        self.doc.notes.push(note);
        self.persister();
    }

    pub fn retirer_note(&mut self, index: usize) -> Option<Note> {
        if index >= self.doc.notes.len() {
            return None;
        }
        let note = self.doc.notes.remove(index);
        self.persister();
        Some(note)
    }
}
