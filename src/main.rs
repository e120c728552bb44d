// src/main.rs
//
// witt's Calculator : point d’entrée NATIF + WEB (WASM)
// ------------------------------------------------------
// - NATIF (Linux/Windows/macOS) : env_logger + eframe::run_native
// - WEB  (wasm32)              : eframe::WebRunner + <canvas id="the_canvas_id">
// - Préférences chargées une fois ici, puis possédées par AppCalc
// - Police CJK système (natif) pour l’interface zh

#![cfg_attr(target_arch = "wasm32", allow(unused_imports))]

use eframe::egui;

mod app;
mod calcul;
mod noyau;
mod preferences;
mod traduction;

use app::AppCalc;
use preferences::StorePreferences;

/// Titre unique (natif + web).
const TITRE_APP: &str = "witt's Calculator";

fn creer_app() -> AppCalc {
    let chemin = StorePreferences::chemin_par_defaut();
    log::info!("préférences: {}", chemin.display());
    AppCalc::new(StorePreferences::charger(chemin))
}

/* ------------------------ Polices (natif) ------------------------ */

/// Emplacements usuels d’une police couvrant le chinois simplifié.
#[cfg(not(target_arch = "wasm32"))]
const POLICES_CJK: [&str; 7] = [
    "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/noto-cjk/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/google-noto-cjk/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/truetype/wqy/wqy-microhei.ttc",
    "/System/Library/Fonts/PingFang.ttc",
    "/System/Library/Fonts/STHeiti Light.ttc",
    "C:\\Windows\\Fonts\\msyh.ttc",
];

/// Ajoute la première police CJK trouvée en repli des familles par défaut.
#[cfg(not(target_arch = "wasm32"))]
fn installer_polices(ctx: &egui::Context) {
    use egui::{FontData, FontDefinitions, FontFamily};

    let Some((chemin, octets)) = POLICES_CJK
        .iter()
        .find_map(|p| std::fs::read(p).ok().map(|o| (*p, o)))
    else {
        log::warn!("aucune police CJK trouvée : l’interface zh peut afficher des carrés");
        return;
    };

    let mut fonts = FontDefinitions::default();
    fonts
        .font_data
        .insert("cjk".to_string(), FontData::from_owned(octets).into());

    for famille in [FontFamily::Proportional, FontFamily::Monospace] {
        fonts
            .families
            .entry(famille)
            .or_default()
            .push("cjk".to_string());
    }

    ctx.set_fonts(fonts);
    log::info!("police CJK: {chemin}");
}

/* ------------------------ Entrée NATIF (PC) ------------------------ */

#[cfg(not(target_arch = "wasm32"))]
fn main() -> eframe::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(TITRE_APP)
            .with_inner_size([600.0, 900.0])
            .with_min_inner_size([420.0, 620.0]),
        ..Default::default()
    };

    eframe::run_native(
        TITRE_APP,
        options,
        Box::new(|cc| {
            // Contexte egui prêt => polices avant la première frame.
            installer_polices(&cc.egui_ctx);
            Ok(Box::new(creer_app()))
        }),
    )
}

/* ------------------------ Entrée WEB (WASM) ------------------------ */

#[cfg(target_arch = "wasm32")]
fn main() {
    // En wasm32, le démarrage réel passe par `start()` (wasm_bindgen).
}

#[cfg(target_arch = "wasm32")]
mod web {
    use super::{creer_app, TITRE_APP};

    use wasm_bindgen::JsCast;
    use web_sys::{window, HtmlCanvasElement};

    /// ID du canvas attendu dans index.html.
    const CANVAS_ID: &str = "the_canvas_id";

    /// Point d’entrée automatique au chargement de la page.
    /// Les préférences ne peuvent pas être écrites depuis le navigateur :
    /// chaque sauvegarde échoue (journalisée) et la session repart des défauts.
    #[wasm_bindgen::prelude::wasm_bindgen(start)]
    pub async fn start() -> Result<(), wasm_bindgen::JsValue> {
        let w = window().ok_or_else(|| js_err("window() unavailable"))?;
        let d = w
            .document()
            .ok_or_else(|| js_err("document() unavailable"))?;

        d.set_title(TITRE_APP);

        let el = d
            .get_element_by_id(CANVAS_ID)
            .ok_or_else(|| js_err("canvas not found (check the id in index.html)"))?;

        let canvas: HtmlCanvasElement = el
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| js_err("element is not a <canvas>"))?;

        eframe::WebRunner::new()
            .start(
                canvas,
                eframe::WebOptions::default(),
                Box::new(|_cc| Ok(Box::new(creer_app()))),
            )
            .await
    }

    fn js_err(msg: &str) -> wasm_bindgen::JsValue {
        wasm_bindgen::JsValue::from_str(msg)
    }
}
