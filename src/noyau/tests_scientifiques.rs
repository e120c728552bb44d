//! Tests scientifiques (campagne) : invariants + robustesse + limites contrôlées.
//!
//! But : trouver les limites sans faire chauffer la machine.
//! - budget temps global
//! - tailles bornées (profondeur, longueur)
//!
//! Notes :
//! - Trig spéciale reconnaît les multiples rationnels de π, y compris sous forme
//!   de somme (π/4 + 2π) : la périodicité se teste donc directement.
//! - Le mode degré passe par la table des symboles (sin(x) => sin(x·π/180)).
//! - Les formes exactes affichées sont relisibles : eval(exact) == exact.

use std::time::{Duration, Instant};

use super::eval::Resultat;
use super::eval_expression;
use super::rpn::JETONS_MAX;
use super::symboles::ModeAngle;

fn eval_ok(expr: &str) -> Resultat {
    eval_mode(expr, ModeAngle::Radian)
}

fn eval_mode(expr: &str, mode: ModeAngle) -> Resultat {
    eval_expression(expr, &mode.table()).unwrap_or_else(|e| panic!("expr={expr:?} err={e}"))
}

fn assert_indefini(expr: &str) {
    let r = eval_ok(expr);
    assert_eq!(r.exact, "zoo", "expr={expr:?}");
    assert_eq!(r.approx.as_deref(), Some("zoo"), "expr={expr:?}");
}

fn assert_exact_eq(expr: &str, attendu: &str) {
    assert_eq!(eval_ok(expr).exact, attendu, "expr={expr:?}");
}

fn assert_deg_eq(expr: &str, attendu: &str) {
    assert_eq!(eval_mode(expr, ModeAngle::Degre).exact, attendu, "expr={expr:?}");
}

/// Budget global anti-gel.
fn budget(start: Instant, max: Duration) {
    if start.elapsed() > max {
        panic!("budget temps dépassé: {:?}", max);
    }
}

/* ------------------------ Invariants trig (angles spéciaux) ------------------------ */

#[test]
fn sci_indefinis() {
    assert_indefini("tan(pi/2)");
    assert_indefini("tan(3*pi/2)");
    assert_indefini("tan(-pi/2)");
    assert_indefini("1/0");
    assert_indefini("ln(0)");
}

#[test]
fn sci_identites_symetrie() {
    // sin(-x) = -sin(x)
    assert_exact_eq("sin(-pi/4)", "-√2/2");
    assert_exact_eq("sin(pi/4)", "√2/2");

    // cos(-x) = cos(x)
    assert_exact_eq("cos(-pi/3)", "1/2");
    assert_exact_eq("cos(pi/3)", "1/2");

    // tan(-x) = -tan(x) (hors indéfini)
    assert_exact_eq("tan(-pi/6)", "-√3/3");
    assert_exact_eq("tan(pi/6)", "√3/3");
}

#[test]
fn sci_periodicite_angles() {
    assert_exact_eq("sin(9*pi/4)", "√2/2");
    assert_exact_eq("sin(pi/4 + 2*pi)", "√2/2");
    assert_exact_eq("cos(7*pi/3)", "1/2");
    // tan(π + π/6) = tan(π/6)
    assert_exact_eq("tan(7*pi/6)", "√3/3");
}

#[test]
fn sci_inverses() {
    assert_exact_eq("asin(1/2)", "π/6");
    assert_exact_eq("acos(-1)", "π");
    assert_exact_eq("atan(-1)", "-π/4");
    assert_exact_eq("acos(sqrt(2)/2)", "π/4");
}

#[test]
fn sci_propagation_indefini() {
    assert_indefini("1 + tan(pi/2)");
    assert_indefini("tan(pi/2) + 1");
    assert_indefini("2 * tan(pi/2)");
    assert_indefini("tan(pi/2) / 3");
}

/* ------------------------ Mode degré ------------------------ */

#[test]
fn sci_mode_degre() {
    assert_deg_eq("sin(30)", "1/2");
    assert_deg_eq("sin(-90)", "-1");
    assert_deg_eq("cos(180)", "-1");
    assert_deg_eq("tan(90)", "zoo");
    assert_deg_eq("sin(45)", "√2/2");

    let r = eval_mode("sin(90)", ModeAngle::Degre);
    assert_eq!(r.approx.as_deref(), Some("1.00000000000000"));
}

#[test]
fn sci_degre_multiples_de_90() {
    for k in -8..=8 {
        let r = eval_mode(&format!("sin({})", 90 * k), ModeAngle::Degre);
        assert!(
            ["0", "1", "-1"].contains(&r.exact.as_str()),
            "sin({}) = {}",
            90 * k,
            r.exact
        );
    }
}

/* ------------------------ Cohérence algébrique (zéro) ------------------------ */

#[test]
fn sci_zero_algebrique() {
    assert_exact_eq("(1/2 + 1/3) - 5/6", "0");
    assert_exact_eq("(2/3 * 3/4) - 1/2", "0");
    assert_exact_eq("sqrt(2)*sqrt(2) - 2", "0");
    assert_exact_eq("x - x", "0");

    // rationalisation : même forme canonique des deux côtés
    assert_exact_eq("1/sqrt(3)", "√3/3");
    assert_exact_eq("sqrt(3)/3", "√3/3");
    assert_exact_eq("sqrt(3)/3 - 1/sqrt(3)", "0");
}

#[test]
fn sci_multiples_de_pi() {
    assert_exact_eq("90*pi/180", "π/2");
    assert_exact_eq("pi/4 + pi/4", "π/2");
    assert_exact_eq("2*pi - pi", "π");
}

#[test]
fn sci_formes_relisibles() {
    for s in ["3π/2", "√2/2", "-√3/3", "e^2", "-π/4", "5/6"] {
        assert_exact_eq(s, s);
    }
}

/* ------------------------ Approximation ------------------------ */

#[test]
fn sci_approximation() {
    let r = eval_ok("1/3");
    assert_eq!(r.exact, "1/3");
    assert_eq!(r.approx.as_deref(), Some("0.333333333333333"));

    let r = eval_ok("10**20");
    assert_eq!(r.exact, "100000000000000000000");
    assert_eq!(r.approx.as_deref(), Some("1.00000000000000e+20"));
}

#[test]
fn sci_approx_coherence() {
    // si EXACT n'est pas indéfini et sans variable, l’approximation doit exister
    for s in ["sin(pi/4)", "sqrt(5)", "ln(2)", "exp(1/2)", "atan(2)"] {
        let r = eval_ok(s);
        assert_ne!(r.exact, "zoo");
        assert!(r.approx.is_some(), "expr={s:?}");
    }
    assert!(eval_ok("2*x").approx.is_none());
}

/* ------------------------ Stress contrôlé (sans brûler) ------------------------ */

#[test]
fn sci_stress_profondeur_sqrt_safe() {
    let t0 = Instant::now();
    let max = Duration::from_secs(2);

    // sqrt(4) -> 2 ; (2)^2 -> 4 ; on alterne pour garder un rationnel
    let mut expr = "4".to_string();
    for k in 0..60 {
        expr = if k % 2 == 0 {
            format!("sqrt({expr})")
        } else {
            format!("({expr})^2")
        };
    }

    assert_exact_eq(&expr, "4");
    budget(t0, max);
}

#[test]
fn sci_stress_taille_somme_safe() {
    let t0 = Instant::now();
    let max = Duration::from_secs(2);

    let expr = vec!["1/2"; 80].join(" + ");

    // 80*(1/2)=40
    assert_exact_eq(&expr, "40");
    budget(t0, max);
}

#[test]
fn sci_stress_bigint_safe() {
    let t0 = Instant::now();
    let max = Duration::from_secs(2);

    // (10^100 - 1)/7 + 1/7 = 10^100/7
    let big = "9".repeat(100);
    let expr = format!("{big}/7 + 1/7");

    assert_exact_eq(&expr, &format!("1{}/7", "0".repeat(100)));
    budget(t0, max);
}

#[test]
fn sci_limites_refusees_proprement() {
    let trop_long = vec!["1"; JETONS_MAX].join("+");
    assert!(eval_expression(&trop_long, &ModeAngle::Radian.table()).is_err());

    let trop_profond = format!("{}1{}", "(".repeat(500), ")".repeat(500));
    assert!(eval_expression(&trop_profond, &ModeAngle::Radian.table()).is_err());

    // puissance énorme : reste symbolique, pas de gel
    let r = eval_ok("10^100000");
    assert_eq!(r.exact, "10^100000");
}
