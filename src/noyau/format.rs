// src/noyau/format.rs
//
// Affichage EXACT
// ---------------
// Imprimeur à précédence : parenthèses seulement quand elles changent le sens.
// Cas “jolis” conservés : √2/2, 3√2/2, π/2, -3π/4.
// La sortie reste relisible par le tokenizer (2π et 3√2 y sont acceptés).

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, Zero};

use super::expr::Expr;

const ADD: u8 = 1;
const MUL: u8 = 2;
const NEG: u8 = 3;
const POW: u8 = 4;
const ATOME: u8 = 5;

/// Forme exacte affichée (indéfini => "zoo").
pub fn format_exact(e: &Expr) -> String {
    rendu(e).0
}

/* ------------------------ Helpers rationnels ------------------------ */

fn rendu_rat(r: &BigRational) -> (String, u8) {
    let n = r.numer();
    let d = r.denom();
    let s = if d.is_one() {
        format!("{n}")
    } else {
        format!("{n}/{d}")
    };
    let p = if r.is_negative() {
        NEG
    } else if d.is_one() {
        ATOME
    } else {
        MUL
    };
    (s, p)
}

fn format_sqrt_of_int(n: &BigInt) -> String {
    format!("√{n}")
}

/// (p/q)*√n -> p√n/q ; √n/q si p=1 ; -√n/q si p=-1
fn format_mul_rat_sqrt(r: &BigRational, n: &BigInt) -> String {
    let p = r.numer();
    let q = r.denom();

    if p.is_zero() {
        return "0".to_string();
    }

    let tete = if p.is_one() {
        format_sqrt_of_int(n)
    } else if p == &BigInt::from(-1) {
        format!("-{}", format_sqrt_of_int(n))
    } else {
        format!("{p}{}", format_sqrt_of_int(n))
    };

    if q.is_one() {
        tete
    } else {
        format!("{tete}/{q}")
    }
}

fn as_sqrt_of_int(e: &Expr) -> Option<&BigInt> {
    match e {
        Expr::Sqrt(inner) => match inner.as_ref() {
            Expr::Rat(r) if r.denom().is_one() && !r.is_negative() => Some(r.numer()),
            _ => None,
        },
        _ => None,
    }
}

/* ------------------------ π “joli” ------------------------ */

/// coeff*π : affichage joli (π/2, 3π/2, -2π, etc.)
pub fn format_coeff_pi(coeff: &BigRational) -> String {
    let n = coeff.numer();
    let d = coeff.denom();

    if coeff.is_zero() {
        return "0".to_string();
    }

    let tete = if n.is_one() {
        "π".to_string()
    } else if n == &BigInt::from(-1) {
        "-π".to_string()
    } else {
        format!("{n}π")
    };

    if d.is_one() {
        tete
    } else {
        format!("{tete}/{d}")
    }
}

/* ------------------------ Imprimeur ------------------------ */

fn entoure(s: String, besoin: bool) -> String {
    if besoin {
        format!("({s})")
    } else {
        s
    }
}

fn prec_signee(s: &str, p: u8) -> u8 {
    if s.starts_with('-') {
        NEG
    } else {
        p
    }
}

fn collect_mul<'a>(e: &'a Expr, out: &mut Vec<&'a Expr>) {
    match e {
        Expr::Mul(a, b) => {
            collect_mul(a, out);
            collect_mul(b, out);
        }
        other => out.push(other),
    }
}

fn rendu(e: &Expr) -> (String, u8) {
    use Expr::*;

    match e {
        Indefini => ("zoo".to_string(), ATOME),

        Rat(r) => rendu_rat(r),
        Pi => ("π".to_string(), ATOME),
        E => ("e".to_string(), ATOME),
        Var(s) => (s.clone(), ATOME),

        Sqrt(x) => match as_sqrt_of_int(e) {
            Some(n) => (format_sqrt_of_int(n), ATOME),
            None => (format!("√({})", rendu(x).0), ATOME),
        },

        PowInt(x, n) => {
            let (sx, px) = rendu(x);
            let base = entoure(sx, px < ATOME);
            let exposant = if *n < 0 { format!("({n})") } else { n.to_string() };
            (format!("{base}^{exposant}"), POW)
        }

        Pow(x, y) => {
            let (sx, px) = rendu(x);
            let (sy, py) = rendu(y);
            let base = entoure(sx, px < ATOME);
            (format!("{base}^{}", entoure(sy, py < ATOME)), POW)
        }

        App(f, x) => (format!("{}({})", f.nom(), rendu(x).0), ATOME),

        Add(a, b) => {
            let (sa, _) = rendu(a);
            let (sb, _) = rendu(b);
            (format!("{sa} + {sb}"), ADD)
        }

        Sub(a, b) => {
            let (sb, pb) = rendu(b);
            if matches!(a.as_ref(), Rat(r) if r.is_zero()) {
                return (format!("-{}", entoure(sb, pb <= ADD)), NEG);
            }
            let (sa, _) = rendu(a);
            (format!("{sa} - {}", entoure(sb, pb <= ADD || pb == NEG)), ADD)
        }

        Mul(_, _) => rendu_mul(e),

        Div(a, b) => {
            let (sa, pa) = rendu(a);
            let (sb, pb) = rendu(b);
            let s = format!("{}/{}", entoure(sa, pa < MUL), entoure(sb, pb <= NEG));
            let p = prec_signee(&s, MUL);
            (s, p)
        }
    }
}

fn rendu_mul(e: &Expr) -> (String, u8) {
    use Expr::*;

    let mut facteurs = Vec::new();
    collect_mul(e, &mut facteurs);

    // coefficient rationnel en tête
    let (coeff, reste): (Option<&BigRational>, &[&Expr]) = match facteurs.split_first() {
        Some((Rat(r), reste)) => (Some(r), reste),
        _ => (None, &facteurs[..]),
    };

    // cas “jolis” : c·π, c·√n
    if let (Some(c), [seul]) = (coeff, reste) {
        if matches!(seul, Pi) {
            let s = format_coeff_pi(c);
            let p = prec_signee(&s, MUL);
            return (s, p);
        }
        if let Some(n) = as_sqrt_of_int(seul) {
            let s = format_mul_rat_sqrt(c, n);
            let p = prec_signee(&s, MUL);
            return (s, p);
        }
    }

    let corps = reste
        .iter()
        .enumerate()
        .map(|(i, f)| {
            let (s, p) = rendu(f);
            // -x en tête reste lisible ; ailleurs on entoure
            let besoin = p < MUL || (p == NEG && (i > 0 || coeff.is_some()));
            entoure(s, besoin)
        })
        .collect::<Vec<_>>()
        .join("*");

    let s = match coeff {
        None => corps,
        Some(c) => {
            let p = c.numer();
            let q = c.denom();
            let tete = if p.is_one() {
                corps
            } else if p == &BigInt::from(-1) {
                format!("-{corps}")
            } else {
                format!("{p}*{corps}")
            };
            if q.is_one() {
                tete
            } else {
                format!("{tete}/{q}")
            }
        }
    };

    let p = prec_signee(&s, MUL);
    (s, p)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noyau::expr::{entier, neg, rat};

    fn var(s: &str) -> Expr {
        Expr::Var(s.into())
    }

    fn mul(a: Expr, b: Expr) -> Expr {
        Expr::Mul(Box::new(a), Box::new(b))
    }

    #[test]
    fn rationnels_et_constantes() {
        assert_eq!(format_exact(&rat(5, 6)), "5/6");
        assert_eq!(format_exact(&entier(-3)), "-3");
        assert_eq!(format_exact(&Expr::Pi), "π");
        assert_eq!(format_exact(&Expr::E), "e");
        assert_eq!(format_exact(&Expr::Indefini), "zoo");
    }

    #[test]
    fn multiples_de_pi() {
        assert_eq!(format_exact(&mul(rat(1, 2), Expr::Pi)), "π/2");
        assert_eq!(format_exact(&mul(rat(-3, 4), Expr::Pi)), "-3π/4");
        assert_eq!(format_exact(&mul(entier(2), Expr::Pi)), "2π");
        assert_eq!(format_exact(&neg(Expr::Pi)), "-π");
    }

    #[test]
    fn racines_jolies() {
        let r2 = Expr::Sqrt(Box::new(entier(2)));
        assert_eq!(format_exact(&mul(rat(1, 2), r2.clone())), "√2/2");
        assert_eq!(format_exact(&mul(rat(-3, 2), r2.clone())), "-3√2/2");
        assert_eq!(format_exact(&r2), "√2");
        let rx = Expr::Sqrt(Box::new(Expr::Add(Box::new(var("x")), Box::new(entier(1)))));
        assert_eq!(format_exact(&rx), "√(x + 1)");
    }

    #[test]
    fn parentheses_minimales() {
        let somme = Expr::Add(Box::new(var("x")), Box::new(entier(1)));
        assert_eq!(format_exact(&mul(entier(2), somme.clone())), "2*(x + 1)");
        assert_eq!(
            format_exact(&Expr::Sub(Box::new(var("y")), Box::new(somme.clone()))),
            "y - (x + 1)"
        );
        assert_eq!(format_exact(&Expr::PowInt(Box::new(somme), 2)), "(x + 1)^2");
        assert_eq!(format_exact(&mul(rat(1, 3), var("x"))), "x/3");
        assert_eq!(format_exact(&mul(entier(-1), var("x"))), "-x");
    }

    #[test]
    fn fonctions() {
        let e = Expr::App(crate::noyau::expr::Fonction::Sin, Box::new(entier(1)));
        assert_eq!(format_exact(&e), "sin(1)");
        assert_eq!(format_exact(&Expr::PowInt(Box::new(Expr::E), 2)), "e^2");
    }
}
