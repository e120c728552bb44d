// src/app.rs
//
// Module App (racine)
// -------------------
// Rôle:
// - Déclarer les sous-modules (état, vue, réglages, fenêtres)
// - Ré-exporter AppCalc (pour main.rs: use crate::app::AppCalc;)
// - Fournir l’impl eframe::App (compatible NATIF + WEB)
//
// Le thème suit `dark_mode` des préférences ; il est réappliqué dès qu’il change.

pub mod etat;
mod fenetres;
mod reglages;
pub mod vue;

// Ré-export pratique : `use crate::app::AppCalc;`
pub use etat::AppCalc;

use eframe::egui;

impl eframe::App for AppCalc {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let sombre = self.prefs.doc().dark_mode;
        if ctx.style().visuals.dark_mode != sombre {
            let visuels = if sombre {
                egui::Visuals::dark()
            } else {
                egui::Visuals::light()
            };
            ctx.set_visuals(visuels);
        }

        // ESC = effacer seulement l’entrée (comme bouton "C"),
        // sauf si un dialogue est ouvert (ESC l’annule).
        let esc = ctx.input(|i| i.key_pressed(egui::Key::Escape));
        if esc && self.dialogue.is_none() {
            self.clear_entree();
        }

        self.ui(ctx);
    }
}
