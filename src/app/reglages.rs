// src/app/reglages.rs
//
// Onglet Réglages : langue, thème sombre, boutons personnalisés,
// éditeur de correspondances, emplacement du fichier de préférences.

use eframe::egui;

use super::etat::{AppCalc, Confirmation, Dialogue};
use crate::preferences::Langue;
use crate::traduction::nom_langue;

impl AppCalc {
    pub(super) fn ui_reglages(&mut self, ui: &mut egui::Ui) {
        let langue = self.langue();

        ui.horizontal(|ui| {
            ui.label(egui::RichText::new(self.t("choose_language")).size(18.0));

            let mut choix = langue;
            egui::ComboBox::from_id_salt("choix_langue")
                .selected_text(nom_langue(langue, langue))
                .width(300.0)
                .show_ui(ui, |ui| {
                    for l in Langue::TOUTES {
                        ui.selectable_value(&mut choix, l, nom_langue(langue, l));
                    }
                });
            if choix != langue {
                self.set_langue(choix);
            }
        });

        ui.add_space(6.0);

        let mut sombre = self.prefs.doc().dark_mode;
        if ui.checkbox(&mut sombre, self.t("dark_mode")).changed() {
            self.set_dark_mode(sombre);
        }

        ui.add_space(6.0);

        if ui.button(self.t("revert_customizations")).clicked() {
            self.dialogue = Some(Dialogue::Confirmer(Confirmation::ResetLibelles));
        }
        if ui.button(self.t("list_mappings")).clicked() {
            self.correspondances_ouvertes = true;
        }

        ui.add_space(10.0);
        ui.label(egui::RichText::new(self.t("mapping_help")).weak());

        ui.add_space(10.0);
        ui.horizontal_wrapped(|ui| {
            ui.label(self.t("preferences_file"));
            ui.monospace(self.prefs.chemin().display().to_string());
        });

        ui.with_layout(egui::Layout::bottom_up(egui::Align::Min), |ui| {
            ui.label(egui::RichText::new(self.t("copyright")).color(egui::Color32::GRAY));
        });
    }

    /// Contenu de la fenêtre « Mapping Editor ».
    pub(super) fn ui_correspondances(&mut self, ui: &mut egui::Ui) {
        let mut clic = None;

        egui::ScrollArea::vertical()
            .id_salt("table_correspondances")
            .max_height(260.0)
            .show(ui, |ui| {
                egui::Grid::new("grille_correspondances")
                    .num_columns(2)
                    .striped(true)
                    .min_col_width(140.0)
                    .show(ui, |ui| {
                        ui.strong(self.t("mapping_name"));
                        ui.strong(self.t("mapping_replacement"));
                        ui.end_row();

                        for (alias, remplacement) in self.prefs.doc().correspondances.iter() {
                            let choisi = self.correspondance_selectionnee.as_deref() == Some(alias);
                            if ui.selectable_label(choisi, alias).clicked() {
                                clic = Some(alias.to_string());
                            }
                            ui.monospace(remplacement);
                            ui.end_row();
                        }
                    });
            });

        if clic.is_some() {
            self.correspondance_selectionnee = clic;
        }

        ui.separator();
        ui.horizontal(|ui| {
            if ui.button(self.t("add_mapping")).clicked() {
                self.dialogue = Some(Dialogue::AliasCorrespondance {
                    alias: String::new(),
                });
            }
            let selection = self.correspondance_selectionnee.is_some();
            if ui
                .add_enabled(selection, egui::Button::new(self.t("remove_mapping")))
                .clicked()
            {
                self.retirer_correspondance_selectionnee();
            }
            if ui.button(self.t("revert_mappings")).clicked() {
                self.dialogue = Some(Dialogue::Confirmer(Confirmation::ResetCorrespondances));
            }
        });

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui.button(self.t("ok")).clicked() {
                self.correspondances_ouvertes = false;
            }
        });
    }
}
