// src/noyau/trig.rs
//
// Trig spéciale (angles “exactement reconnus”)
// -------------------------------------------
// - sin/cos/tan : extraction coeff·π (Expr::coeff_pi), réduction modulo période,
//   symétries vers [0, π/2], table sur {0, π/6, π/4, π/3, π/2}
// - asin/acos/atan : recherche inverse dans les mêmes tables, comparaison sur
//   la forme canonique (pas de flottants)

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, ToPrimitive, Zero};

use super::canon::canon_expr;
use super::expr::{mod_rationnel, multiple_de_pi, Expr, Fonction};

/// Angles du premier quadrant reconnus (fractions de π).
const ANGLES: [(i64, i64); 5] = [(0, 1), (1, 6), (1, 4), (1, 3), (1, 2)];

/// Valeur exacte de la forme coeff·√racine.
#[derive(Clone, Debug)]
struct Valeur {
    coeff: BigRational,
    racine: Option<i64>,
}

impl Valeur {
    fn rat(p: i64, q: i64) -> Self {
        Self {
            coeff: frac(p, q),
            racine: None,
        }
    }

    fn racine(p: i64, q: i64, n: i64) -> Self {
        Self {
            coeff: frac(p, q),
            racine: Some(n),
        }
    }

    fn oppose(self) -> Self {
        Self {
            coeff: -self.coeff,
            racine: self.racine,
        }
    }

    /// Forme canonique (celle que produit canon_expr) : Rat, √n ou Mul(Rat, √n).
    fn en_expr(self) -> Expr {
        match self.racine {
            _ if self.coeff.is_zero() => Expr::Rat(self.coeff),
            None => Expr::Rat(self.coeff),
            Some(n) => {
                let r = Expr::Sqrt(Box::new(Expr::Rat(BigRational::from_integer(BigInt::from(n)))));
                if self.coeff.is_one() {
                    r
                } else {
                    Expr::Mul(Box::new(Expr::Rat(self.coeff)), Box::new(r))
                }
            }
        }
    }
}

fn frac(p: i64, q: i64) -> BigRational {
    BigRational::new(BigInt::from(p), BigInt::from(q))
}

fn petit(c: &BigRational) -> Option<(i64, i64)> {
    Some((c.numer().to_i64()?, c.denom().to_i64()?))
}

/* ------------------------ sin / cos / tan ------------------------ */

/// sin(c·π) exact si c est un angle spécial.
fn sin_exact(c: &BigRational) -> Option<Valeur> {
    let un = BigRational::one();
    let c = mod_rationnel(c, 2);

    // sin(π + t) = -sin(t)
    let (c, oppose) = if c >= un { (c - &un, true) } else { (c, false) };

    // sin(π - t) = sin(t)
    let t = if c > frac(1, 2) { un - c } else { c };

    let v = match petit(&t)? {
        (0, _) => Valeur::rat(0, 1),
        (1, 6) => Valeur::rat(1, 2),
        (1, 4) => Valeur::racine(1, 2, 2),
        (1, 3) => Valeur::racine(1, 2, 3),
        (1, 2) => Valeur::rat(1, 1),
        _ => return None,
    };

    Some(if oppose { v.oppose() } else { v })
}

/// tan(c·π) : Some(Indefini) pour π/2 (mod π).
fn tan_exact(c: &BigRational) -> Option<Expr> {
    let c = mod_rationnel(c, 1);
    let demi = frac(1, 2);

    if c == demi {
        return Some(Expr::Indefini);
    }

    // tan(π - t) = -tan(t)
    let (t, oppose) = if c > demi {
        (BigRational::one() - c, true)
    } else {
        (c, false)
    };

    let v = tan_premier_quadrant(&t)?;
    let v = if oppose { v.oppose() } else { v };
    Some(v.en_expr())
}

fn tan_premier_quadrant(t: &BigRational) -> Option<Valeur> {
    let v = match petit(t)? {
        (0, _) => Valeur::rat(0, 1),
        (1, 6) => Valeur::racine(1, 3, 3),
        (1, 4) => Valeur::rat(1, 1),
        (1, 3) => Valeur::racine(1, 1, 3),
        _ => return None,
    };
    Some(v)
}

/// Reconnaît sin/cos/tan d’un multiple rationnel de π.
///
/// Retour:
/// - Some(expr_exact) si reconnu (Expr::Indefini pour tan(π/2 + kπ))
/// - None si non reconnu
pub fn trig_special(x: &Expr, f: Fonction) -> Option<Expr> {
    let c = x.coeff_pi()?;

    match f {
        Fonction::Sin => sin_exact(&c).map(Valeur::en_expr),
        // cos(t) = sin(t + π/2)
        Fonction::Cos => sin_exact(&(c + frac(1, 2))).map(Valeur::en_expr),
        Fonction::Tan => tan_exact(&c),
        _ => None,
    }
}

/* ------------------------ asin / acos / atan ------------------------ */

/// Reconnaît asin/acos/atan d’une valeur de table ; renvoie un multiple de π.
pub fn trig_inverse_special(x: &Expr, f: Fonction) -> Option<Expr> {
    let cible = canon_expr(x.clone());

    match f {
        Fonction::Asin | Fonction::Acos => {
            for (k, n) in ANGLES {
                let angle = frac(k, n);
                let v = sin_exact(&angle)?;

                // asin(±v) = ±angle ; acos(v) = π/2 - asin(v)
                let asin = if v.clone().en_expr() == cible {
                    Some(angle.clone())
                } else if v.oppose().en_expr() == cible {
                    Some(-angle)
                } else {
                    None
                };

                if let Some(a) = asin {
                    let res = match f {
                        Fonction::Acos => frac(1, 2) - a,
                        _ => a,
                    };
                    return Some(multiple_de_pi(res));
                }
            }
            None
        }

        Fonction::Atan => {
            for (k, n) in &ANGLES[..4] {
                let angle = frac(*k, *n);
                let v = tan_premier_quadrant(&angle)?;
                if v.clone().en_expr() == cible {
                    return Some(multiple_de_pi(angle));
                }
                if v.oppose().en_expr() == cible {
                    return Some(multiple_de_pi(-angle));
                }
            }
            None
        }

        _ => None,
    }
}
