// src/traduction.rs
//
// Libellés de l’interface (en / zh).
// Une clé inconnue s’affiche telle quelle : c’est le libellé par défaut des
// boutons personnalisables (custom1..custom5).

use crate::preferences::Langue;

/// Libellé de `cle` dans `langue` ; la clé elle-même si absente.
pub fn t(langue: Langue, cle: &'static str) -> &'static str {
    let trouve = match langue {
        Langue::En => en(cle),
        Langue::Zh => zh(cle),
    };
    trouve.unwrap_or(cle)
}

/// Nom de la langue tel qu’affiché dans le sélecteur (dans la langue courante).
pub fn nom_langue(courante: Langue, langue: Langue) -> &'static str {
    match langue {
        Langue::En => t(courante, "english"),
        Langue::Zh => t(courante, "chinese"),
    }
}

/// Libellés identiques dans toutes les langues (touches du pavé).
fn commun(cle: &str) -> Option<&'static str> {
    let s = match cle {
        "app_title" => "witt's Calculator",
        "clear" => "C",
        "backspace" => "<--",
        "sin" => "sin",
        "cos" => "cos",
        "tan" => "tan",
        "ln" => "ln",
        "open_paren" => "(",
        "close_paren" => ")",
        "power" => "**",
        "divide" => "/",
        "multiply" => "*",
        "subtract" => "-",
        "add" => "+",
        "dot" => ".",
        "equals" => "EXE",
        "divider" => "------------------------",
        _ => return None,
    };
    Some(s)
}

fn en(cle: &str) -> Option<&'static str> {
    let s = match cle {
        "standard_tab" => "Standard",
        "latex_tab" => "LaTeX (Experimental)",
        "settings_tab" => "Settings",
        "enter_expression" => "Enter expression (e.g. 2*sin(pi/4) + ln(10))",
        "enter_latex" => r"Enter LaTeX expression (e.g. \frac{1}{2} + \sqrt{4})",
        "mode_rad" => "Mode: RAD",
        "mode_deg" => "Mode: DEG",
        "error_prefix" => "<ERROR>: ",
        "choose_language" => "Language:",
        "english" => "English",
        "chinese" => "现代汉语 (Simplified Chinese)",
        "custom_help" => {
            "----------- TIPS -----------\n\
             (1) Use 'pi' (or π) for \u{03c0} and 'e' for Euler's number.\n\
             (2) Right-click any custom button to change its label.\n\
             (3) Right-click a history entry to delete it.\n\
             (4) Mappings (set in the Mapping Editor) replace function names (e.g. arctan -> atan)."
        }
        "list_mappings" => "Mapping Editor...",
        "mapping_editor" => "Mapping Editor",
        "mapping_name" => "Before",
        "mapping_replacement" => "After",
        "add_mapping" => "Add Mapping",
        "remove_mapping" => "Remove Selected Mapping",
        "revert_mappings" => "Reset All Mappings",
        "confirm_revert_mappings" => "Are you sure you want to revert all mappings?",
        "revert_customizations" => "Reset Button Customizations",
        "confirm_revert_labels" => "Are you sure you want to revert all button labels?",
        "ok" => "OK",
        "cancel" => "Cancel",
        "yes" => "Yes",
        "no" => "No",
        "customize_button_label" => "Customize Buttons",
        "enter_new_label" => "Enter new label:",
        "prompt_add_mapping_name" => "Enter mapping name (e.g. arcsin):",
        "prompt_add_mapping_replacement" => "Enter replacement (e.g. asin):",
        "dark_mode" => "Dark Mode",
        "mapping_help" => {
            "Mappings replace text in your input. For example, if you set 'arctan' to 'atan', \
             every occurrence is replaced."
        }
        "preferences_file" => "Preferences file:",
        "copyright" => "witt's Calculator Beta 1.0\nBy witt\nIcon by 3s.",
        "open_notes" => "Notes...",
        "notebook" => "Notes",
        "clear_history" => "Clear History",
        "confirm_clear_history" => "Are you sure you want to clear all history?",
        "save_analytical" => "Save Analytical",
        "save_approx" => "Save Approximation",
        "save_note" => "Save Note",
        "enter_note_name" => "Enter note name:",
        "delete_entry" => "Delete Entry",
        "add_note" => "Add Note",
        "delete_note" => "Delete Note",
        "note_name" => "Name",
        "note_type" => "Type",
        "note_value" => "Value",
        "note_input" => "Input",
        _ => return commun(cle),
    };
    Some(s)
}

fn zh(cle: &str) -> Option<&'static str> {
    let s = match cle {
        "standard_tab" => "标准",
        "latex_tab" => "LaTeX（实验性）",
        "settings_tab" => "设置",
        "enter_expression" => "输入表达式（如2*sin(pi/4) + ln(10)）",
        "enter_latex" => r"输入LaTeX表达式（如\frac{1}{2} + \sqrt{4}）",
        "mode_rad" => "当前：弧度制",
        "mode_deg" => "当前：角度制",
        "error_prefix" => "<错误>: ",
        "choose_language" => "语言:",
        "english" => "英语（English）",
        "chinese" => "现代汉语",
        "custom_help" => {
            "----------- 提示 -----------\n\
             (1) pi（或 π）表示 \u{03c0}；e 表示自然常数\n\
             (2) 右键自定义按钮以配置其标签\n\
             (3) 右键历史记录可将其删除\n\
             (4) 映射（在设置中配置）可替换函数名称（如 arctan -> atan）"
        }
        "list_mappings" => "映射管理器...",
        "mapping_editor" => "映射管理器",
        "mapping_name" => "映射前",
        "mapping_replacement" => "映射后",
        "add_mapping" => "添加映射",
        "remove_mapping" => "移除选定映射",
        "revert_mappings" => "重置所有映射",
        "confirm_revert_mappings" => "确定要重置所有映射吗？",
        "revert_customizations" => "重置自定义按钮",
        "confirm_revert_labels" => "确定要重置所有按钮标签吗？",
        "ok" => "确定",
        "cancel" => "取消",
        "yes" => "是",
        "no" => "否",
        "customize_button_label" => "自定义按钮",
        "enter_new_label" => "输入新标签：",
        "prompt_add_mapping_name" => "输入映射名称（如 arcsin）：",
        "prompt_add_mapping_replacement" => "输入替换（如 asin）：",
        "dark_mode" => "深色界面",
        "mapping_help" => {
            "映射用于替换输入文本。例如，如果你设置 'arctan' 的映射为 'atan'，则所有 'arctan' 都会被替换。"
        }
        "preferences_file" => "配置文件：",
        "copyright" => "witt's Calculator Beta 1.0\n制作：witt\n图标绘制：3s.",
        "open_notes" => "笔记本...",
        "notebook" => "笔记本",
        "clear_history" => "清除历史记录",
        "confirm_clear_history" => "确定要清除所有历史记录吗？",
        "save_analytical" => "保存解析值",
        "save_approx" => "保存近似值",
        "save_note" => "保存笔记",
        "enter_note_name" => "输入笔记名称：",
        "delete_entry" => "删除记录",
        "add_note" => "添加笔记",
        "delete_note" => "删除笔记",
        "note_name" => "名称",
        "note_type" => "类型",
        "note_value" => "值",
        "note_input" => "输入",
        _ => return commun(cle),
    };
    Some(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefixes_d_erreur() {
        assert_eq!(t(Langue::En, "error_prefix"), "<ERROR>: ");
        assert_eq!(t(Langue::Zh, "error_prefix"), "<错误>: ");
    }

    #[test]
    fn cle_inconnue_affichee_telle_quelle() {
        assert_eq!(t(Langue::En, "custom3"), "custom3");
        assert_eq!(t(Langue::Zh, "custom5"), "custom5");
    }

    #[test]
    fn touches_communes() {
        for langue in Langue::TOUTES {
            assert_eq!(t(langue, "equals"), "EXE");
            assert_eq!(t(langue, "power"), "**");
            assert_eq!(t(langue, "app_title"), "witt's Calculator");
        }
    }

    #[test]
    fn mode_et_langues() {
        assert_eq!(t(Langue::En, "mode_deg"), "Mode: DEG");
        assert_eq!(t(Langue::Zh, "mode_rad"), "当前：弧度制");
        assert_eq!(nom_langue(Langue::Zh, Langue::En), "英语（English）");
        assert_eq!(nom_langue(Langue::En, Langue::Zh), "现代汉语 (Simplified Chinese)");
    }

    #[test]
    fn les_deux_tables_ont_les_memes_cles() {
        let cles = [
            "standard_tab",
            "latex_tab",
            "settings_tab",
            "enter_expression",
            "enter_latex",
            "custom_help",
            "mapping_editor",
            "confirm_clear_history",
            "save_note",
            "note_input",
            "preferences_file",
        ];
        for cle in cles {
            assert!(en(cle).is_some(), "en: {cle}");
            assert!(zh(cle).is_some(), "zh: {cle}");
        }
    }
}
