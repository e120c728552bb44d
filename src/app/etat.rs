//! src/app/etat.rs
//!
//! État UI (sans widgets).
//!
//! Rôle : contenir l’état de la calculatrice (saisies, mode d’angle, historiques,
//! fenêtres et dialogues ouverts) et offrir les opérations déclenchées par les
//! boutons, sans logique d’affichage.
//!
//! Contrats :
//! - Les préférences sont possédées ici ; chaque mutation passe par le store
//!   (sauvegarde immédiate).
//! - Les historiques vivent en mémoire seulement.
//! - Le mode d’angle n’est pas persisté : `Radian` au lancement.

use crate::calcul::{Calculatrice, EntreeHistorique, Issue};
use crate::noyau::ModeAngle;
use crate::preferences::{Langue, Note, StorePreferences};
use crate::traduction::t;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Onglet {
    #[default]
    Standard,
    Latex,
    Reglages,
}

/// Historique visé par une action (chaque onglet de calcul a le sien).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Source {
    Standard,
    Latex,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GenreNote {
    Analytique,
    Approximation,
}

impl GenreNote {
    /// Valeur du champ `type` dans le fichier (indépendante de la langue).
    pub fn libelle(self) -> &'static str {
        match self {
            GenreNote::Analytique => "Analytical",
            GenreNote::Approximation => "Approximation",
        }
    }

    pub fn cle_bouton(self) -> &'static str {
        match self {
            GenreNote::Analytique => "save_analytical",
            GenreNote::Approximation => "save_approx",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Confirmation {
    EffacerHistorique,
    ResetLibelles,
    ResetCorrespondances,
}

impl Confirmation {
    pub fn cle_question(self) -> &'static str {
        match self {
            Confirmation::EffacerHistorique => "confirm_clear_history",
            Confirmation::ResetLibelles => "confirm_revert_labels",
            Confirmation::ResetCorrespondances => "confirm_revert_mappings",
        }
    }
}

/// Dialogue modal en cours (un seul à la fois).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Dialogue {
    Libelle {
        bouton: &'static str,
        texte: String,
    },
    NomNote {
        source: Source,
        index: usize,
        genre: GenreNote,
        nom: String,
    },
    NouvelleNote {
        nom: String,
        valeur: String,
        genre: String,
    },
    /// Ajout de correspondance, 1re question : l’alias.
    AliasCorrespondance { alias: String },
    /// 2e question : le remplacement.
    RemplacementCorrespondance { alias: String, remplacement: String },
    Confirmer(Confirmation),
}

pub struct AppCalc {
    // --- préférences (persistées) ---
    pub prefs: StorePreferences,

    // --- pipeline ---
    calc: Calculatrice,

    // --- onglet standard ---
    pub entree: String,
    pub mode: ModeAngle,
    pub historique: Vec<EntreeHistorique>,

    // --- onglet LaTeX ---
    pub entree_latex: String,
    pub historique_latex: Vec<EntreeHistorique>,

    // --- navigation / fenêtres ---
    pub onglet: Onglet,
    pub notes_ouvertes: bool,
    pub correspondances_ouvertes: bool,
    pub note_selectionnee: Option<usize>,
    pub correspondance_selectionnee: Option<String>,
    pub dialogue: Option<Dialogue>,

    // --- UX ---
    // Permet à vue.rs de redonner le focus à l’entrée après un clic sur un bouton.
    pub focus_entree: bool,
}

impl AppCalc {
    pub fn new(prefs: StorePreferences) -> Self {
        Self {
            prefs,
            calc: Calculatrice::default(),
            entree: String::new(),
            mode: ModeAngle::Radian,
            historique: Vec::new(),
            entree_latex: String::new(),
            historique_latex: Vec::new(),
            onglet: Onglet::Standard,
            notes_ouvertes: false,
            correspondances_ouvertes: false,
            note_selectionnee: None,
            correspondance_selectionnee: None,
            dialogue: None,
            focus_entree: true,
        }
    }

    /* ------------------------ Localisation ------------------------ */

    pub fn langue(&self) -> Langue {
        self.prefs.doc().langue
    }

    pub fn t(&self, cle: &'static str) -> &'static str {
        t(self.langue(), cle)
    }

    /// Libellé affiché (et inséré) par un bouton : remplacement utilisateur,
    /// sinon la traduction.
    pub fn libelle_bouton(&self, id: &'static str) -> String {
        match self.prefs.doc().labels.get(id) {
            Some(l) => l.clone(),
            None => self.t(id).to_string(),
        }
    }

    /* ------------------------ Onglet standard ------------------------ */

    pub fn inserer(&mut self, texte: &str) {
        self.entree.push_str(texte);
        self.focus_entree = true;
    }

    /// C : effacer seulement l’entrée (l’historique reste).
    pub fn clear_entree(&mut self) {
        self.entree.clear();
        self.focus_entree = true;
    }

    /// <-- : retire le dernier caractère.
    pub fn retour_arriere(&mut self) {
        self.entree.pop();
        self.focus_entree = true;
    }

    pub fn basculer_mode(&mut self) {
        self.mode = self.mode.basculer();
    }

    /// EXE : évalue l’entrée ; rien si elle ne contient que des blancs.
    /// L’entrée n’est pas effacée.
    pub fn executer(&mut self) {
        let prefixe = self.t("error_prefix");
        let entree = self.calc.calculer(
            &self.entree,
            self.mode,
            &self.prefs.doc().correspondances,
            prefixe,
        );
        if let Some(e) = entree {
            self.historique.push(e);
        }
        self.focus_entree = true;
    }

    /* ------------------------ Onglet LaTeX ------------------------ */

    /// Évalue la saisie LaTeX ; l’entrée est vidée seulement en cas de succès.
    pub fn executer_latex(&mut self) {
        let prefixe = self.t("error_prefix");
        let Some(e) = self.calc.calculer_latex(&self.entree_latex, prefixe) else {
            return;
        };
        if matches!(e.issue, Issue::Succes(_)) {
            self.entree_latex.clear();
        }
        self.historique_latex.push(e);
    }

    /* ------------------------ Historiques ------------------------ */

    pub fn historique_de(&self, source: Source) -> &[EntreeHistorique] {
        match source {
            Source::Standard => &self.historique,
            Source::Latex => &self.historique_latex,
        }
    }

    pub fn supprimer_entree(&mut self, source: Source, index: usize) {
        let h = match source {
            Source::Standard => &mut self.historique,
            Source::Latex => &mut self.historique_latex,
        };
        if index < h.len() {
            h.remove(index);
        }
    }

    /* ------------------------ Notes ------------------------ */

    /// Enregistre un résultat de l’historique comme note.
    /// Refusé si le nom est vide ou si la valeur demandée n’existe pas.
    pub fn enregistrer_note(
        &mut self,
        source: Source,
        index: usize,
        genre: GenreNote,
        nom: &str,
    ) -> bool {
        if nom.is_empty() {
            return false;
        }
        let Some(entree) = self.historique_de(source).get(index) else {
            return false;
        };
        let Some(r) = entree.resultat() else {
            return false;
        };
        let valeur = match genre {
            GenreNote::Analytique => Some(r.exact.clone()),
            GenreNote::Approximation => r.approx.clone(),
        };
        let Some(value) = valeur else {
            return false;
        };

        let note = Note {
            name: nom.to_string(),
            genre: genre.libelle().to_string(),
            value,
            input: Some(entree.entree.clone()),
        };
        self.prefs.ajouter_note(note);
        true
    }

    /// Note saisie à la main : pas de texte d’entrée.
    pub fn ajouter_note_main(&mut self, nom: &str, valeur: &str, genre: &str) {
        self.prefs.ajouter_note(Note {
            name: nom.to_string(),
            genre: genre.to_string(),
            value: valeur.to_string(),
            input: None,
        });
    }

    pub fn supprimer_note_selectionnee(&mut self) {
        if let Some(i) = self.note_selectionnee.take() {
            self.prefs.retirer_note(i);
        }
    }

    /* ------------------------ Réglages ------------------------ */

    pub fn set_langue(&mut self, langue: Langue) {
        if langue != self.langue() {
            self.prefs.set_langue(langue);
        }
    }

    pub fn set_dark_mode(&mut self, actif: bool) {
        self.prefs.set_dark_mode(actif);
    }

    /// Libellé vide => libellé d’origine.
    pub fn set_libelle(&mut self, bouton: &'static str, texte: &str) {
        self.prefs.set_label(bouton, texte);
    }

    /// Alias et remplacement doivent être non vides.
    pub fn ajouter_correspondance(&mut self, alias: &str, remplacement: &str) -> bool {
        if alias.is_empty() || remplacement.is_empty() {
            return false;
        }
        self.prefs.ajouter_correspondance(alias, remplacement);
        true
    }

    pub fn retirer_correspondance_selectionnee(&mut self) {
        if let Some(alias) = self.correspondance_selectionnee.take() {
            self.prefs.retirer_correspondance(&alias);
        }
    }

    /// Action confirmée par l’utilisateur.
    pub fn confirmer(&mut self, c: Confirmation) {
        match c {
            Confirmation::EffacerHistorique => self.historique.clear(),
            Confirmation::ResetLibelles => self.prefs.reset_labels(),
            Confirmation::ResetCorrespondances => {
                self.correspondance_selectionnee = None;
                self.prefs.reset_correspondances();
            }
        }
    }
}
