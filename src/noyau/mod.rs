//! Noyau exact (rationnels, π, e)
//!
//! Organisation interne :
//! - pretraitement.rs : normalisation des blancs + correspondances alias -> remplacement
//! - symboles.rs      : mode d’angle + table des symboles (sin/cos/tan en degrés)
//! - jetons.rs        : tokenisation (décimaux exacts, ** et ^, π, √)
//! - rpn.rs           : shunting-yard + construction Expr (contrôles de syntaxe)
//! - expr.rs          : AST exact + simplify + coeff*π
//! - trig.rs          : angles spéciaux, inverses, indéfini
//! - canon.rs         : forme canonique déterministe
//! - format.rs        : affichage EXACT (√2/2, 3π/2, zoo…)
//! - approx.rs        : approximation (f64, ou mantisse + exposant au-delà), 15 chiffres
//! - latex.rs         : traduction LaTeX -> texte (onglet expérimental)
//! - eval.rs          : pipeline complet

pub mod approx;
pub mod canon;
pub mod eval;
pub mod expr;
pub mod format;
pub mod jetons;
pub mod latex;
pub mod pretraitement;
pub mod rpn;
pub mod symboles;
pub mod trig;

#[cfg(test)]
mod tests_scientifiques;

#[cfg(test)]
mod tests_fuzz_safe;

// API publique minimale
pub use eval::{eval_expression, Resultat};
pub use symboles::{ModeAngle, TableSymboles};
