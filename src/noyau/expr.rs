// src/noyau/expr.rs
//
// AST exact (sans flottants).
// - Rat : rationnel exact
// - Pi, E : constantes symboliques π et e
// - Indefini : résultat exact indéfini (ex: tan(π/2), 1/0), affiché "zoo"
// - Var : symbole libre (ex: x)
// - App : fonction transcendante unaire (sin, cos, tan, asin, acos, atan, ln, exp)
//
// IMPORTANT (SAFE):
// - simplify() ne doit jamais “inventer” une valeur pour Var.
// - L’approximation est bloquée dès qu'il y a Var.

use crate::noyau::canon::canon_expr;
use crate::noyau::format::format_exact;
use crate::noyau::trig::{trig_inverse_special, trig_special};

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};

use std::fmt;

/// Au-delà, une puissance de rationnel reste symbolique (anti-gel).
pub(crate) const EXPOSANT_MAX: i64 = 4096;

/// Taille maximale (en bits, numérateur + dénominateur) d’une puissance calculée.
pub(crate) const BITS_MAX: u64 = 1 << 20;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Fonction {
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Ln,
    Exp,
}

impl Fonction {
    pub fn nom(self) -> &'static str {
        match self {
            Fonction::Sin => "sin",
            Fonction::Cos => "cos",
            Fonction::Tan => "tan",
            Fonction::Asin => "asin",
            Fonction::Acos => "acos",
            Fonction::Atan => "atan",
            Fonction::Ln => "ln",
            Fonction::Exp => "exp",
        }
    }

    /// sin/cos/tan : les seules entrées qui dépendent du mode d’angle.
    pub fn est_trig_directe(self) -> bool {
        matches!(self, Fonction::Sin | Fonction::Cos | Fonction::Tan)
    }

    pub fn applique_f64(self, x: f64) -> f64 {
        match self {
            Fonction::Sin => x.sin(),
            Fonction::Cos => x.cos(),
            Fonction::Tan => x.tan(),
            Fonction::Asin => x.asin(),
            Fonction::Acos => x.acos(),
            Fonction::Atan => x.atan(),
            Fonction::Ln => x.ln(),
            Fonction::Exp => x.exp(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Expr {
    Rat(BigRational),
    Pi,
    E,
    Indefini,

    Var(String),

    Sqrt(Box<Expr>),            // √(x)
    PowInt(Box<Expr>, i64),     // x^n (n entier)
    Pow(Box<Expr>, Box<Expr>),  // x^y (y non entier ou symbolique)
    App(Fonction, Box<Expr>),   // f(x)

    Add(Box<Expr>, Box<Expr>),
    Sub(Box<Expr>, Box<Expr>),
    Mul(Box<Expr>, Box<Expr>),
    Div(Box<Expr>, Box<Expr>),
}

/* ------------------------ Constructeurs ------------------------ */

pub fn rat(n: i64, d: i64) -> Expr {
    Expr::Rat(BigRational::new(BigInt::from(n), BigInt::from(d)))
}

pub fn entier(n: i64) -> Expr {
    Expr::Rat(BigRational::from_integer(BigInt::from(n)))
}

/// -x, sous la forme Sub(0, x) (ou rationnel opposé).
pub fn neg(e: Expr) -> Expr {
    match e {
        Expr::Rat(r) => Expr::Rat(-r),
        Expr::Sub(a, b) if est_zero(&a) => *b,
        other => Expr::Sub(Box::new(Expr::Rat(BigRational::zero())), Box::new(other)),
    }
}

/// c·π sous forme canonique : 0, π, -π ou Mul(Rat(c), π).
pub fn multiple_de_pi(c: BigRational) -> Expr {
    if c.is_zero() {
        return Expr::Rat(c);
    }
    if c.is_one() {
        return Expr::Pi;
    }
    if (-c.clone()).is_one() {
        return neg(Expr::Pi);
    }
    Expr::Mul(Box::new(Expr::Rat(c)), Box::new(Expr::Pi))
}

pub(crate) fn est_zero(e: &Expr) -> bool {
    matches!(e, Expr::Rat(r) if r.is_zero())
}

impl Expr {
    /// Canonicalisation forte (déterminisme structurel), hors de l’AST.
    pub fn canon(self) -> Expr {
        canon_expr(self)
    }

    /// Simplification locale (SAFE), sans heuristiques.
    pub fn simplify(self) -> Expr {
        use Expr::*;

        match self {
            Rat(_) | Pi | E | Indefini | Var(_) => self,

            Add(a, b) => {
                let a = a.simplify();
                let b = b.simplify();
                match (&a, &b) {
                    (Indefini, _) | (_, Indefini) => Indefini,
                    (Rat(x), Rat(y)) => Rat(x + y),
                    (Rat(x), _) if x.is_zero() => b,
                    (_, Rat(y)) if y.is_zero() => a,
                    _ => Add(Box::new(a), Box::new(b)),
                }
            }

            Sub(a, b) => {
                let a = a.simplify();
                let b = b.simplify();
                match (&a, &b) {
                    (Indefini, _) | (_, Indefini) => Indefini,
                    _ if a == b => Rat(BigRational::zero()),
                    (Rat(x), Rat(y)) => Rat(x - y),
                    (_, Rat(y)) if y.is_zero() => a,
                    // 0 - (0 - x) => x
                    (Rat(x), Sub(z, _)) if x.is_zero() && est_zero(z) => neg(b),
                    _ => Sub(Box::new(a), Box::new(b)),
                }
            }

            Mul(a, b) => simplifie_mul(a.simplify(), b.simplify()),
            Div(a, b) => simplifie_div(a.simplify(), b.simplify()),

            PowInt(base, n) => simplifie_pow_int(base.simplify(), n),

            Pow(base, exposant) => {
                let base = base.simplify();
                let exposant = exposant.simplify();
                if matches!(base, Indefini) || matches!(exposant, Indefini) {
                    return Indefini;
                }
                if let Rat(r) = &exposant {
                    if r.is_integer() {
                        if let Some(n) = r.to_integer().to_i64() {
                            return simplifie_pow_int(base, n);
                        }
                    }
                    // x^(p/2) => √(x^p)
                    if r.denom() == &BigInt::from(2) {
                        if let Some(p) = r.numer().to_i64() {
                            return Sqrt(Box::new(PowInt(Box::new(base), p))).simplify();
                        }
                    }
                }
                if base == E {
                    return App(Fonction::Exp, Box::new(exposant)).simplify();
                }
                Pow(Box::new(base), Box::new(exposant))
            }

            Sqrt(x) => {
                let x = x.simplify();
                if matches!(x, Indefini) {
                    return Indefini;
                }
                if let Rat(r) = &x {
                    if let Some(s) = rational_sqrt_exact(r) {
                        return Rat(s);
                    }
                }
                Sqrt(Box::new(x))
            }

            App(f, x) => simplifie_app(f, x.simplify()),
        }
    }

    /// Détecte un coeff·π (sommes, différences, produits et quotients rationnels de π).
    ///
    /// SAFE: Var, e, racines, fonctions => None (on ne “devine” rien).
    pub fn coeff_pi(&self) -> Option<BigRational> {
        use Expr::*;

        match self {
            Pi => Some(BigRational::one()),
            // 0 = 0·π (sin(0), cos(0) en mode degré)
            Rat(r) if r.is_zero() => Some(BigRational::zero()),

            Add(a, b) => Some(a.coeff_pi()? + b.coeff_pi()?),

            Sub(a, b) => {
                // Sub(0, x) => -coeff(x)
                if est_zero(a) {
                    return Some(-b.coeff_pi()?);
                }
                Some(a.coeff_pi()? - b.coeff_pi()?)
            }

            Mul(a, b) => match (a.as_ref(), b.as_ref()) {
                (Rat(r), x) | (x, Rat(r)) => Some(x.coeff_pi()? * r),
                _ => None,
            },

            Div(a, b) => match b.as_ref() {
                Rat(r) if !r.is_zero() => Some(a.coeff_pi()? / r),
                _ => None,
            },

            Rat(_) | E | Indefini | Var(_) | Sqrt(_) | PowInt(_, _) | Pow(_, _) | App(_, _) => None,
        }
    }
}

/* ------------------------ Règles locales ------------------------ */

fn simplifie_mul(a: Expr, b: Expr) -> Expr {
    use Expr::*;

    if matches!(a, Indefini) || matches!(b, Indefini) {
        return Indefini;
    }

    if let (Sqrt(x), Sqrt(y)) = (&a, &b) {
        // √x * √x => x
        if x == y {
            return (**x).clone();
        }
        // √u * √v => √(u*v) si u,v rationnels >= 0
        if let (Rat(ru), Rat(rv)) = (x.as_ref(), y.as_ref()) {
            if !ru.is_negative() && !rv.is_negative() {
                return Sqrt(Box::new(Rat(ru * rv))).simplify();
            }
        }
    }

    match (&a, &b) {
        (Rat(x), Rat(y)) => Rat(x * y),
        (Rat(x), _) | (_, Rat(x)) if x.is_zero() => Rat(BigRational::zero()),
        (Rat(x), _) if x.is_one() => b,
        (_, Rat(y)) if y.is_one() => a,
        _ => Mul(Box::new(a), Box::new(b)),
    }
}

fn simplifie_div(a: Expr, b: Expr) -> Expr {
    use Expr::*;

    if matches!(a, Indefini) || matches!(b, Indefini) {
        return Indefini;
    }

    // x/0 : indéfini (zoo)
    if est_zero(&b) {
        return Indefini;
    }

    if a == b {
        return Rat(BigRational::one());
    }

    // √u / √v => √(u/v) si u,v rationnels > 0
    if let (Sqrt(u), Sqrt(v)) = (&a, &b) {
        if let (Rat(ru), Rat(rv)) = (u.as_ref(), v.as_ref()) {
            if ru.is_positive() && rv.is_positive() {
                return Sqrt(Box::new(Rat(ru / rv))).simplify();
            }
        }
    }

    match (&a, &b) {
        (Rat(x), Rat(y)) => Rat(x / y),
        (_, Rat(y)) if y.is_one() => a,

        // (p/q) / √n => (p/qn) * √n, si n entier > 0
        (Rat(x), Sqrt(inner)) => match inner.as_ref() {
            Rat(n) if n.is_positive() && n.is_integer() => simplifie_mul(
                Rat(x / n),
                Sqrt(Box::new(Rat(n.clone()))),
            ),
            _ => Div(Box::new(a), Box::new(b)),
        },

        _ => Div(Box::new(a), Box::new(b)),
    }
}

pub(crate) fn simplifie_pow_int(base: Expr, n: i64) -> Expr {
    use Expr::*;

    if matches!(base, Indefini) {
        return Indefini;
    }
    if n == 0 {
        return Rat(BigRational::one());
    }
    if n == 1 {
        return base;
    }

    match base {
        Rat(r) => {
            if r.is_zero() && n < 0 {
                return Indefini;
            }
            if puissance_calculable(&r, n) {
                return Rat(rational_pow_int(r, n));
            }
            PowInt(Box::new(Rat(r)), n)
        }
        // (x^a)^b => x^(a*b)
        PowInt(x, m) => match m.checked_mul(n) {
            Some(k) => simplifie_pow_int(*x, k),
            None => PowInt(Box::new(PowInt(x, m)), n),
        },
        // (√x)^(2k) => x^k
        Sqrt(x) if n % 2 == 0 => simplifie_pow_int(*x, n / 2),
        autre => PowInt(Box::new(autre), n),
    }
}

fn simplifie_app(f: Fonction, x: Expr) -> Expr {
    use Expr::*;

    if matches!(x, Indefini) {
        return Indefini;
    }

    match f {
        Fonction::Sin | Fonction::Cos | Fonction::Tan => {
            if let Some(v) = trig_special(&x, f) {
                return v;
            }
            // Parité : f(-t)
            let oppose = match &x {
                Sub(z, t) if est_zero(z) => Some((**t).clone()),
                Rat(r) if r.is_negative() => Some(Rat(-r.clone())),
                _ => None,
            };
            match oppose {
                Some(t) if f == Fonction::Cos => App(f, Box::new(t)),
                Some(t) => neg(App(f, Box::new(t))),
                None => App(f, Box::new(x)),
            }
        }

        Fonction::Asin | Fonction::Acos | Fonction::Atan => {
            trig_inverse_special(&x, f).unwrap_or_else(|| App(f, Box::new(x)))
        }

        Fonction::Ln => match x {
            Rat(r) if r.is_one() => Rat(BigRational::zero()),
            Rat(r) if r.is_zero() => Indefini,
            E => Rat(BigRational::one()),
            PowInt(base, n) if *base == E => Rat(BigRational::from_integer(BigInt::from(n))),
            App(Fonction::Exp, y) => *y,
            autre => App(f, Box::new(autre)),
        },

        Fonction::Exp => match x {
            Rat(r) if r.is_integer() => match r.to_integer().to_i64() {
                Some(n) if n.unsigned_abs() <= EXPOSANT_MAX as u64 => simplifie_pow_int(E, n),
                _ => App(f, Box::new(Rat(r))),
            },
            App(Fonction::Ln, y) => *y,
            autre => App(f, Box::new(autre)),
        },
    }
}

/* ------------------------ Modulo rationnel exact (sans flottants) ------------------------ */

/// Réduit `coeff` dans [0, periode) (ex: periode=2 pour sin/cos, 1 pour tan).
pub(crate) fn mod_rationnel(coeff: &BigRational, periode: i64) -> BigRational {
    if periode <= 0 {
        return coeff.clone();
    }
    let p = BigRational::from_integer(BigInt::from(periode));
    let tours = (coeff / &p).floor();
    coeff - tours * p
}

/* ------------------------ Affichage ------------------------ */

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_exact(self))
    }
}

/* ------------------------ Outils rationnels ------------------------ */

/// Borne l’exposant ET la taille du résultat (anti-gel).
fn puissance_calculable(r: &BigRational, n: i64) -> bool {
    let k = n.unsigned_abs();
    let bits = r.numer().bits() + r.denom().bits();
    k <= EXPOSANT_MAX as u64 && bits.saturating_mul(k) <= BITS_MAX
}

pub(crate) fn rational_pow_int(base: BigRational, exp: i64) -> BigRational {
    if exp < 0 {
        return BigRational::one() / rational_pow_int(base, -exp);
    }

    let mut e = exp as u64;
    let mut acc = BigRational::one();
    let mut b = base;

    while e > 0 {
        if (e & 1) == 1 {
            acc *= b.clone();
        }
        e >>= 1;
        if e > 0 {
            b *= b.clone();
        }
    }
    acc
}

fn rational_sqrt_exact(r: &BigRational) -> Option<BigRational> {
    if r.is_negative() {
        return None;
    }
    let sn = int_sqrt_exact(r.numer())?;
    let sd = int_sqrt_exact(r.denom())?;
    Some(BigRational::new(sn, sd))
}

fn int_sqrt_exact(x: &BigInt) -> Option<BigInt> {
    if x.is_negative() {
        return None;
    }
    let s = x.sqrt();
    if &s * &s == *x {
        Some(s)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn var(s: &str) -> Expr {
        Expr::Var(s.into())
    }

    #[test]
    fn division_par_zero_indefinie() {
        let e = Expr::Div(Box::new(entier(1)), Box::new(entier(0)));
        assert_eq!(e.simplify(), Expr::Indefini);
    }

    #[test]
    fn indefini_contamine() {
        let e = Expr::Add(Box::new(Expr::Indefini), Box::new(var("x")));
        assert_eq!(e.simplify(), Expr::Indefini);
    }

    #[test]
    fn x_moins_x() {
        let e = Expr::Sub(Box::new(var("x")), Box::new(var("x")));
        assert_eq!(e.simplify(), entier(0));
    }

    #[test]
    fn puissances_rationnelles() {
        let e = Expr::PowInt(Box::new(rat(2, 3)), -2);
        assert_eq!(e.simplify(), rat(9, 4));

        let zero_neg = Expr::PowInt(Box::new(entier(0)), -1);
        assert_eq!(zero_neg.simplify(), Expr::Indefini);

        // trop grand : reste symbolique
        let gros = Expr::PowInt(Box::new(entier(10)), EXPOSANT_MAX + 1);
        assert!(matches!(gros.simplify(), Expr::PowInt(_, _)));
    }

    #[test]
    fn puissances_bornees_en_taille() {
        // 10^4096 tient dans le budget, (10^4096)^4096 non
        let base = Expr::PowInt(Box::new(entier(10)), EXPOSANT_MAX).simplify();
        assert!(matches!(base, Expr::Rat(_)));

        let tour = Expr::PowInt(Box::new(base), EXPOSANT_MAX).simplify();
        assert!(matches!(tour, Expr::PowInt(_, _)));

        let tour = Expr::PowInt(Box::new(tour), EXPOSANT_MAX).simplify();
        assert!(matches!(tour, Expr::PowInt(_, _)));
    }

    #[test]
    fn exposant_demi_devient_racine() {
        let e = Expr::Pow(Box::new(entier(4)), Box::new(rat(1, 2)));
        assert_eq!(e.simplify(), entier(2));

        let e = Expr::Pow(Box::new(entier(2)), Box::new(rat(1, 2)));
        assert_eq!(e.simplify(), Expr::Sqrt(Box::new(entier(2))));
    }

    #[test]
    fn ln_et_exp() {
        let ln_e = Expr::App(Fonction::Ln, Box::new(Expr::E));
        assert_eq!(ln_e.simplify(), entier(1));

        let ln_e3 = Expr::App(Fonction::Ln, Box::new(Expr::PowInt(Box::new(Expr::E), 3)));
        assert_eq!(ln_e3.simplify(), entier(3));

        let exp_1 = Expr::App(Fonction::Exp, Box::new(entier(1)));
        assert_eq!(exp_1.simplify(), Expr::E);

        let aller_retour = Expr::App(
            Fonction::Exp,
            Box::new(Expr::App(Fonction::Ln, Box::new(var("x")))),
        );
        assert_eq!(aller_retour.simplify(), var("x"));
    }

    #[test]
    fn parite_trig() {
        let sin_moins = Expr::App(Fonction::Sin, Box::new(entier(-1)));
        assert_eq!(
            sin_moins.simplify(),
            neg(Expr::App(Fonction::Sin, Box::new(entier(1))))
        );
        let cos_moins = Expr::App(Fonction::Cos, Box::new(neg(var("x"))));
        assert_eq!(
            cos_moins.simplify(),
            Expr::App(Fonction::Cos, Box::new(var("x")))
        );
    }

    #[test]
    fn coeff_pi_etendu() {
        // π/4 + 2π = 9π/4
        let e = Expr::Add(
            Box::new(Expr::Div(Box::new(Expr::Pi), Box::new(entier(4)))),
            Box::new(Expr::Mul(Box::new(entier(2)), Box::new(Expr::Pi))),
        );
        assert_eq!(e.coeff_pi(), Some(BigRational::new(9.into(), 4.into())));
        assert_eq!(var("x").coeff_pi(), None);
        assert_eq!(Expr::E.coeff_pi(), None);
    }

    #[test]
    fn modulo_rationnel() {
        let c = BigRational::new(BigInt::from(-1), BigInt::from(2));
        assert_eq!(mod_rationnel(&c, 2), BigRational::new(3.into(), 2.into()));
        let c = BigRational::new(BigInt::from(9), BigInt::from(4));
        assert_eq!(mod_rationnel(&c, 2), BigRational::new(1.into(), 4.into()));
    }
}
