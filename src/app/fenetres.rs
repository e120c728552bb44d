// src/app/fenetres.rs
//
// Fenêtres flottantes (notes, correspondances) et dialogues modaux.
//
// Un dialogue est retiré de l’état pendant son affichage, puis remis en place
// tant que l’utilisateur n’a ni validé ni annulé.

use eframe::egui;

use super::etat::{AppCalc, Dialogue};

/// Issue d’un dialogue pour la frame courante.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Fin {
    Ouvert,
    Valide,
    Annule,
}

impl AppCalc {
    pub(super) fn ui_fenetres(&mut self, ctx: &egui::Context) {
        if self.notes_ouvertes {
            let mut ouvert = true;
            egui::Window::new(self.t("notebook"))
                .id(egui::Id::new("fenetre_notes"))
                .open(&mut ouvert)
                .default_size([700.0, 360.0])
                .show(ctx, |ui| self.ui_notes(ui));
            self.notes_ouvertes = ouvert;
        }

        if self.correspondances_ouvertes {
            let mut ouvert = true;
            egui::Window::new(self.t("mapping_editor"))
                .id(egui::Id::new("fenetre_correspondances"))
                .open(&mut ouvert)
                .default_size([400.0, 300.0])
                .show(ctx, |ui| self.ui_correspondances(ui));
            // le bouton OK ferme aussi la fenêtre
            self.correspondances_ouvertes &= ouvert;
        }
    }

    fn ui_notes(&mut self, ui: &mut egui::Ui) {
        let mut clic = None;

        egui::ScrollArea::vertical()
            .id_salt("table_notes")
            .max_height(280.0)
            .show(ui, |ui| {
                egui::Grid::new("grille_notes")
                    .num_columns(4)
                    .striped(true)
                    .min_col_width(120.0)
                    .show(ui, |ui| {
                        for cle in ["note_name", "note_type", "note_value", "note_input"] {
                            ui.strong(self.t(cle));
                        }
                        ui.end_row();

                        for (i, n) in self.prefs.doc().notes.iter().enumerate() {
                            let choisi = self.note_selectionnee == Some(i);
                            if ui.selectable_label(choisi, n.name.as_str()).clicked() {
                                clic = Some(i);
                            }
                            ui.label(n.genre.as_str());
                            ui.monospace(n.value.as_str());
                            ui.monospace(n.input.as_deref().unwrap_or(""));
                            ui.end_row();
                        }
                    });
            });

        if clic.is_some() {
            self.note_selectionnee = clic;
        }

        ui.separator();
        ui.horizontal(|ui| {
            if ui.button(self.t("add_note")).clicked() {
                self.dialogue = Some(Dialogue::NouvelleNote {
                    nom: String::new(),
                    valeur: String::new(),
                    genre: String::new(),
                });
            }
            let selection = self.note_selectionnee.is_some();
            if ui
                .add_enabled(selection, egui::Button::new(self.t("delete_note")))
                .clicked()
            {
                self.supprimer_note_selectionnee();
            }
        });
    }

    /* ------------------------ Dialogues ------------------------ */

    pub(super) fn ui_dialogue(&mut self, ctx: &egui::Context) {
        let Some(mut dialogue) = self.dialogue.take() else {
            return;
        };

        let titre = match &dialogue {
            Dialogue::Libelle { .. } => self.t("customize_button_label"),
            Dialogue::NomNote { .. } => self.t("save_note"),
            Dialogue::NouvelleNote { .. } => self.t("add_note"),
            Dialogue::AliasCorrespondance { .. } | Dialogue::RemplacementCorrespondance { .. } => {
                self.t("add_mapping")
            }
            Dialogue::Confirmer(_) => self.t("app_title"),
        };

        let mut fin = Fin::Ouvert;
        egui::Window::new(titre)
            .id(egui::Id::new("dialogue"))
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                fin = self.ui_contenu_dialogue(ui, &mut dialogue);
            });

        match fin {
            Fin::Ouvert => self.dialogue = Some(dialogue),
            Fin::Annule => {}
            Fin::Valide => self.appliquer_dialogue(dialogue),
        }
    }

    fn ui_contenu_dialogue(&self, ui: &mut egui::Ui, dialogue: &mut Dialogue) -> Fin {
        match dialogue {
            Dialogue::Libelle { texte, .. } => {
                ui.label(self.t("enter_new_label"));
                champ(ui, texte);
            }
            Dialogue::NomNote { nom, .. } => {
                ui.label(self.t("enter_note_name"));
                champ(ui, nom);
            }
            Dialogue::NouvelleNote { nom, valeur, genre } => {
                egui::Grid::new("grille_nouvelle_note")
                    .num_columns(2)
                    .show(ui, |ui| {
                        ui.label(self.t("note_name"));
                        champ(ui, nom);
                        ui.end_row();
                        ui.label(self.t("note_value"));
                        champ(ui, valeur);
                        ui.end_row();
                        ui.label(self.t("note_type"));
                        champ(ui, genre);
                        ui.end_row();
                    });
            }
            Dialogue::AliasCorrespondance { alias } => {
                ui.label(self.t("prompt_add_mapping_name"));
                champ(ui, alias);
            }
            Dialogue::RemplacementCorrespondance { remplacement, .. } => {
                ui.label(self.t("prompt_add_mapping_replacement"));
                champ(ui, remplacement);
            }
            Dialogue::Confirmer(c) => {
                ui.label(self.t(c.cle_question()));
            }
        }

        ui.add_space(6.0);

        let (oui, non) = match dialogue {
            Dialogue::Confirmer(_) => (self.t("yes"), self.t("no")),
            _ => (self.t("ok"), self.t("cancel")),
        };

        let entree = ui.input(|i| i.key_pressed(egui::Key::Enter));
        let echap = ui.input(|i| i.key_pressed(egui::Key::Escape));

        let mut fin = Fin::Ouvert;
        ui.horizontal(|ui| {
            if ui.button(oui).clicked() || entree {
                fin = Fin::Valide;
            }
            if ui.button(non).clicked() || echap {
                fin = Fin::Annule;
            }
        });
        fin
    }

    fn appliquer_dialogue(&mut self, dialogue: Dialogue) {
        match dialogue {
            Dialogue::Libelle { bouton, texte } => self.set_libelle(bouton, &texte),
            Dialogue::NomNote {
                source,
                index,
                genre,
                nom,
            } => {
                self.enregistrer_note(source, index, genre, &nom);
            }
            Dialogue::NouvelleNote { nom, valeur, genre } => {
                self.ajouter_note_main(&nom, &valeur, &genre);
            }
            // 1re question validée : on enchaîne sur la seconde
            Dialogue::AliasCorrespondance { alias } => {
                if !alias.is_empty() {
                    self.dialogue = Some(Dialogue::RemplacementCorrespondance {
                        alias,
                        remplacement: String::new(),
                    });
                }
            }
            Dialogue::RemplacementCorrespondance {
                alias,
                remplacement,
            } => {
                self.ajouter_correspondance(&alias, &remplacement);
            }
            Dialogue::Confirmer(c) => self.confirmer(c),
        }
    }
}

/// Champ de saisie d’une ligne, focus automatique à l’ouverture.
fn champ(ui: &mut egui::Ui, texte: &mut String) {
    let resp = ui.add(egui::TextEdit::singleline(texte).desired_width(260.0));
    if ui.memory(|m| m.focused().is_none()) {
        resp.request_focus();
    }
}
