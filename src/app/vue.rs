// src/app/vue.rs
//
// Vue (UI egui) : natif + web
// ---------------------------
// - Barre d’onglets : Standard / LaTeX / Réglages
// - Onglet standard : saisie multi-ligne, mode d’angle, pavé 6×5, historique
// - Historique partagé par les deux onglets de calcul (couleurs, notes, suppression)
//
// Les fenêtres (notes, correspondances) et dialogues sont dans fenetres.rs,
// l’onglet Réglages dans reglages.rs.

use eframe::egui;

use super::etat::{AppCalc, Confirmation, Dialogue, GenreNote, Onglet, Source};
use crate::calcul::Issue;

/// Touche du pavé standard.
#[derive(Clone, Copy, Debug)]
enum Touche {
    /// Insère sa traduction (chiffres : la clé elle-même).
    Texte(&'static str),
    Effacer,
    Retour,
    Executer,
    /// Insère son libellé, modifiable par clic droit.
    Perso(&'static str),
}

use Touche::{Effacer, Executer, Perso, Retour, Texte};

const PAVE: [[Touche; 5]; 6] = [
    [Effacer, Retour, Texte("sin"), Texte("cos"), Texte("tan")],
    [
        Texte("ln"),
        Texte("open_paren"),
        Texte("close_paren"),
        Texte("power"),
        Perso("custom1"),
    ],
    [Texte("7"), Texte("8"), Texte("9"), Texte("divide"), Perso("custom2")],
    [Texte("4"), Texte("5"), Texte("6"), Texte("multiply"), Perso("custom3")],
    [Texte("1"), Texte("2"), Texte("3"), Texte("subtract"), Perso("custom4")],
    [Texte("0"), Texte("dot"), Executer, Texte("add"), Perso("custom5")],
];

/// Action différée sur l’historique (appliquée après l’affichage de la liste).
#[derive(Clone, Copy, Debug)]
enum ActionHistorique {
    Supprimer(usize),
    Noter(usize, GenreNote),
}

impl AppCalc {
    /// UI principale : à appeler depuis eframe::App::update(...)
    pub fn ui(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("onglets").show(ctx, |ui| {
            ui.horizontal(|ui| {
                for (onglet, cle) in [
                    (Onglet::Standard, "standard_tab"),
                    (Onglet::Latex, "latex_tab"),
                    (Onglet::Reglages, "settings_tab"),
                ] {
                    let titre = self.t(cle);
                    ui.selectable_value(&mut self.onglet, onglet, titre);
                }
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.spacing_mut().item_spacing = egui::vec2(6.0, 6.0);
            match self.onglet {
                Onglet::Standard => self.ui_standard(ui),
                Onglet::Latex => self.ui_latex(ui),
                Onglet::Reglages => self.ui_reglages(ui),
            }
        });

        self.ui_fenetres(ctx);
        self.ui_dialogue(ctx);
    }

    /* ------------------------ Onglet standard ------------------------ */

    fn ui_standard(&mut self, ui: &mut egui::Ui) {
        let indice = self.t("enter_expression");
        let resp = ui.add(
            egui::TextEdit::multiline(&mut self.entree)
                .desired_width(ui.available_width())
                .desired_rows(3)
                .hint_text(indice)
                .id_salt("entree_standard")
                .font(egui::TextStyle::Monospace),
        );

        // Après un clic sur une touche, on redonne le focus à la saisie
        // (sauf si un dialogue est ouvert).
        if self.focus_entree && self.dialogue.is_none() {
            resp.request_focus();
        }
        self.focus_entree = false;

        // Ctrl+Enter (Cmd+Enter) = EXE ; Enter seul reste un retour à la ligne.
        let exe = ui.input(|i| i.modifiers.command && i.key_pressed(egui::Key::Enter));
        if resp.has_focus() && exe {
            self.executer();
        }

        ui.horizontal(|ui| {
            if ui.button(self.t(self.mode.cle_traduction())).clicked() {
                self.basculer_mode();
            }
            if ui.button(self.t("open_notes")).clicked() {
                self.notes_ouvertes = true;
            }
            if ui.button(self.t("clear_history")).clicked() {
                self.dialogue = Some(Dialogue::Confirmer(Confirmation::EffacerHistorique));
            }
        });

        ui.label(egui::RichText::new(self.t("custom_help")).small().weak());

        ui.add_space(4.0);
        self.ui_pave(ui);

        ui.add_space(6.0);
        ui.separator();
        self.ui_historique(ui, Source::Standard);
    }

    fn ui_pave(&mut self, ui: &mut egui::Ui) {
        let espace = 6.0;
        let largeur = ((ui.available_width() - 4.0 * espace) / 5.0).max(40.0);

        egui::Grid::new("pave_standard")
            .num_columns(5)
            .spacing([espace, espace])
            .show(ui, |ui| {
                for ligne in PAVE {
                    for touche in ligne {
                        self.bouton_touche(ui, touche, largeur);
                    }
                    ui.end_row();
                }
            });
    }

    fn bouton_touche(&mut self, ui: &mut egui::Ui, touche: Touche, largeur: f32) {
        let libelle = match touche {
            Texte(cle) => self.t(cle).to_string(),
            Effacer => self.t("clear").to_string(),
            Retour => self.t("backspace").to_string(),
            Executer => self.t("equals").to_string(),
            Perso(id) => self.libelle_bouton(id),
        };

        let resp = ui.add_sized([largeur, 40.0], egui::Button::new(libelle.as_str()));

        if resp.clicked() {
            match touche {
                Texte(_) | Perso(_) => self.inserer(&libelle),
                Effacer => self.clear_entree(),
                Retour => self.retour_arriere(),
                Executer => self.executer(),
            }
        }

        if let Perso(id) = touche {
            if resp.secondary_clicked() {
                self.dialogue = Some(Dialogue::Libelle {
                    bouton: id,
                    texte: libelle,
                });
            }
        }
    }

    /* ------------------------ Onglet LaTeX ------------------------ */

    fn ui_latex(&mut self, ui: &mut egui::Ui) {
        let indice = self.t("enter_latex");
        ui.add(
            egui::TextEdit::multiline(&mut self.entree_latex)
                .desired_width(ui.available_width())
                .desired_rows(3)
                .hint_text(indice)
                .id_salt("entree_latex")
                .font(egui::TextStyle::Monospace),
        );

        if ui
            .add_sized([180.0, 32.0], egui::Button::new(self.t("equals")))
            .clicked()
        {
            self.executer_latex();
        }

        ui.separator();
        self.ui_historique(ui, Source::Latex);
    }

    /* ------------------------ Historique ------------------------ */

    fn ui_historique(&mut self, ui: &mut egui::Ui, source: Source) {
        let sombre = ui.visuals().dark_mode;
        let (couleur_exact, couleur_approx) = if sombre {
            (
                egui::Color32::from_rgb(0x00, 0xff, 0x00),
                egui::Color32::from_rgb(0x00, 0xcc, 0xff),
            )
        } else {
            (
                egui::Color32::from_rgb(0x00, 0x64, 0x00),
                egui::Color32::from_rgb(0x00, 0x00, 0xff),
            )
        };

        let mut action = None;

        egui::ScrollArea::vertical()
            .id_salt(("historique", source == Source::Latex))
            .auto_shrink([false, false])
            .stick_to_bottom(true)
            .show(ui, |ui| {
                for (i, e) in self.historique_de(source).iter().enumerate() {
                    let cadre = egui::Frame::group(ui.style()).show(ui, |ui| {
                        ui.set_min_width(ui.available_width());
                        ui.label(egui::RichText::new(e.entree.as_str()).monospace());

                        let droite = egui::Layout::top_down(egui::Align::Max);
                        ui.with_layout(droite, |ui| match &e.issue {
                            Issue::Erreur(msg) => {
                                ui.colored_label(egui::Color32::RED, msg.as_str());
                            }
                            Issue::Succes(r) => {
                                ui.label(
                                    egui::RichText::new(r.exact.as_str())
                                        .color(couleur_exact)
                                        .strong()
                                        .monospace(),
                                );
                                if let Some(a) = &r.approx {
                                    ui.label(
                                        egui::RichText::new(a.as_str()).color(couleur_approx).monospace(),
                                    );
                                }
                                ui.horizontal(|ui| {
                                    let mut genres = vec![GenreNote::Analytique];
                                    if r.approx.is_some() {
                                        genres.push(GenreNote::Approximation);
                                    }
                                    for g in genres {
                                        if ui.button(self.t(g.cle_bouton())).clicked() {
                                            action = Some(ActionHistorique::Noter(i, g));
                                        }
                                    }
                                });
                            }
                        });
                    });

                    cadre
                        .response
                        .interact(egui::Sense::click())
                        .context_menu(|ui| {
                            if ui.button(self.t("delete_entry")).clicked() {
                                action = Some(ActionHistorique::Supprimer(i));
                            }
                        });
                }
            });

        match action {
            Some(ActionHistorique::Supprimer(i)) => self.supprimer_entree(source, i),
            Some(ActionHistorique::Noter(index, genre)) => {
                self.dialogue = Some(Dialogue::NomNote {
                    source,
                    index,
                    genre,
                    nom: String::new(),
                });
            }
            None => {}
        }
    }
}
