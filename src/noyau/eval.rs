//! Noyau : évaluation (pipeline réel)
//!
//! tokenize -> RPN -> Expr (table du mode d’angle) -> simplify (trig spéciale incluse)
//!        -> canon -> re-simplify -> canon -> EXACT -> approximation
//!
//! Le second passage simplify/canon nettoie ce que la canonicalisation a rapproché
//! (√3·√3, e·e⁻¹…) ; la forme finale est toujours une sortie de canon.

use log::debug;

use super::approx::evalue;
use super::expr::Expr;
use super::jetons::{format_tokens, tokenize};
use super::rpn::{from_rpn, to_rpn};
use super::symboles::TableSymboles;

/// Forme exacte + approximation numérique d’une expression.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Resultat {
    pub exact: String,
    /// None si l’expression garde un symbole libre (pas de valeur numérique).
    pub approx: Option<String>,
}

/// API publique : évalue une expression et retourne:
/// - EXACT (forme canonique affichée)
/// - approximation à 15 chiffres : "zoo" si indéfini, None si variable libre
pub fn eval_expression(expr_str: &str, table: &TableSymboles) -> Result<Resultat, String> {
    let s = expr_str.trim();
    if s.is_empty() {
        return Err("empty expression".into());
    }

    // 1) Jetons
    let jetons = tokenize(s)?;

    // 2) RPN
    let rpn = to_rpn(&jetons, table)?;
    debug!(
        "jetons: [{}] ; rpn: [{}]",
        format_tokens(&jetons),
        format_tokens(&rpn)
    );

    // 3) AST (Expr)
    let expr0 = from_rpn(&rpn, table)?;

    // 4) Simplification + forme canonique
    let expr_c = expr0.simplify().canon().simplify().canon();

    // 5) EXACT
    let exact = expr_c.to_string();

    // 6) Approximation (bloquée si variable)
    let approx = match &expr_c {
        Expr::Indefini => Some(exact.clone()),
        _ if contient_var(&expr_c) => None,
        _ => Some(evalue(&expr_c)?.to_string()),
    };

    Ok(Resultat { exact, approx })
}

/// Détecte si une expression contient au moins une variable.
/// Itératif + garde-fous : si l'arbre est trop gros, on retourne true (SAFE => bloque l’approximation).
fn contient_var(expr: &Expr) -> bool {
    use Expr::*;

    const MAX_PILE: usize = 8192;
    const MAX_NOEUDS: usize = 200_000;

    let mut pile: Vec<&Expr> = Vec::with_capacity(64);
    pile.push(expr);

    let mut visites: usize = 0;

    while let Some(e) = pile.pop() {
        visites += 1;
        if visites > MAX_NOEUDS || pile.len() > MAX_PILE {
            return true;
        }

        match e {
            Var(_) => return true,

            Rat(_) | Pi | E | Indefini => {}

            Sqrt(x) | PowInt(x, _) | App(_, x) => pile.push(x.as_ref()),

            Pow(a, b) | Add(a, b) | Sub(a, b) | Mul(a, b) | Div(a, b) => {
                pile.push(a.as_ref());
                pile.push(b.as_ref());
            }
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noyau::symboles::ModeAngle;

    fn ok(s: &str) -> Resultat {
        eval_expression(s, &TableSymboles::radian())
            .unwrap_or_else(|e| panic!("eval_expression({s:?}) erreur: {e}"))
    }

    fn ok_deg(s: &str) -> Resultat {
        eval_expression(s, &ModeAngle::Degre.table())
            .unwrap_or_else(|e| panic!("eval_expression({s:?}) erreur: {e}"))
    }

    fn approx(s: &str) -> String {
        ok(s)
            .approx
            .unwrap_or_else(|| panic!("approximation indisponible pour {s:?}"))
    }

    // --- Variables ---

    #[test]
    fn var_parse_et_affiche() {
        let r = ok("x + 1/2");
        assert_eq!(r.exact, "x + 1/2");
        assert!(r.approx.is_none());
    }

    // --- Rationnels ---

    #[test]
    fn arithmetique_exacte() {
        assert_eq!(ok("2+3").exact, "5");
        assert_eq!(approx("2+3"), "5.00000000000000");
        assert_eq!(ok("1/2 + 1/3").exact, "5/6");
        assert_eq!(ok("2/3 * 3/4").exact, "1/2");
        assert_eq!(ok("-(1/2) + 1").exact, "1/2");
        assert_eq!(ok("0.1 + 0.2").exact, "3/10");
    }

    #[test]
    fn puissances() {
        assert_eq!(ok("2**10").exact, "1024");
        assert_eq!(ok("2^-1").exact, "1/2");
        assert_eq!(ok("-2^2").exact, "-4");
        assert_eq!(ok("4^(1/2)").exact, "2");
    }

    // --- Trig ---

    #[test]
    fn trig_sin_pi_4() {
        let r = ok("sin(pi/4)");
        assert_eq!(r.exact, "√2/2");
        assert_eq!(r.approx.as_deref(), Some("0.707106781186548"));
    }

    #[test]
    fn trig_tan_pi_6() {
        let r = ok("tan(pi/6)");
        assert_eq!(r.exact, "√3/3");
        assert_eq!(r.approx.as_deref(), Some("0.577350269189626"));
    }

    #[test]
    fn trig_tan_pi_2_indefini() {
        let r = ok("tan(pi/2)");
        assert_eq!(r.exact, "zoo");
        assert_eq!(r.approx.as_deref(), Some("zoo"));
    }

    #[test]
    fn trig_composee() {
        assert_eq!(ok("2*sin(pi/4)").exact, "√2");
        assert_eq!(ok("sin(pi/4)*sqrt(2)").exact, "1");
        assert_eq!(ok("sin(pi/4) + cos(pi/4)").exact, "√2");
    }

    #[test]
    fn mode_degre() {
        let r = ok_deg("sin(90)");
        assert_eq!(r.exact, "1");
        assert_eq!(r.approx.as_deref(), Some("1.00000000000000"));

        assert_eq!(ok_deg("cos(60)").exact, "1/2");
        assert_eq!(ok_deg("tan(45)").exact, "1");
        // inverses non enveloppées : résultat en radians
        assert_eq!(ok_deg("asin(1)").exact, "π/2");
    }

    #[test]
    fn mode_radian_sin_90_non_special() {
        let r = ok("sin(90)");
        assert_eq!(r.exact, "sin(90)");
        assert_eq!(r.approx.as_deref(), Some("0.893996663600558"));
    }

    // --- ln / exp / constantes ---

    #[test]
    fn logarithmes() {
        assert_eq!(ok("ln(e)").exact, "1");
        assert_eq!(ok("log(1)").exact, "0");
        assert_eq!(ok("exp(2)").exact, "e^2");
        assert_eq!(approx("e"), "2.71828182845905");
        assert_eq!(approx("pi"), "3.14159265358979");
    }

    // --- Erreurs ---

    #[test]
    fn erreurs() {
        assert!(eval_expression("", &TableSymboles::radian()).is_err());
        assert!(eval_expression("2+*3", &TableSymboles::radian()).is_err());
        assert!(eval_expression("sqrt(-1)", &TableSymboles::radian()).is_err());
        assert!(eval_expression("2 $ 3", &TableSymboles::radian()).is_err());
    }

    #[test]
    fn division_par_zero() {
        assert_eq!(ok("1/0").exact, "zoo");
        // 0/0 et zoo*0 restent zoo (pas de résultat nan distinct)
        let r = ok("0/0");
        assert_eq!(r.exact, "zoo");
        assert_eq!(r.approx.as_deref(), Some("zoo"));
        assert_eq!(ok("(1/0)*0").exact, "zoo");
    }

    #[test]
    fn grandes_valeurs_approchees() {
        let r = ok("e**1000");
        assert_eq!(r.exact, "e^1000");
        assert_eq!(r.approx.as_deref(), Some("1.97007111401705e+434"));

        assert_eq!(approx("10**400"), "1.00000000000000e+400");
        assert_eq!(approx("sin(10**100)"), "-0.372376123661277");
    }

    #[test]
    fn racines_simples() {
        assert_eq!(ok("sqrt(2)").exact, "√2");
        assert_eq!(ok("2**0.5").exact, "√2");
        assert_eq!(approx("sqrt(2)"), "1.41421356237310");
    }

    #[test]
    fn espaces_et_majuscules() {
        assert_eq!(ok("  SIN ( PI / 4 ) ").exact, "√2/2");
    }
}
