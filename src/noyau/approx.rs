// src/noyau/approx.rs
//
// Approximation numérique (forme canonique -> valeur approchée) et affichage à 15
// chiffres significatifs :
// - notation fixe si -5 < exposant décimal < 15 (0.500000000000000, 3.14159265358979)
// - sinon scientifique (1.00000000000000e+20, 1.97007111401705e+434)
//
// Calcul en f64 tant que la valeur y tient. Au-delà (ou en deçà) : mantisse f64 +
// exposant décimal i64. Un grand argument trigonométrique rationnel est réduit
// modulo 2π exactement avant l’appel à sin/cos/tan.
//
// Un résultat non réel (√(-1), ln(-2), asin(2)) est une erreur de domaine.

use std::fmt;

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{Signed, ToPrimitive, Zero};

use super::expr::{mod_rationnel, Expr, Fonction};

/// Chiffres significatifs de l’affichage approché.
pub const CHIFFRES: usize = 15;

const MIN_FIXE: i64 = -5;
const MAX_FIXE: i64 = CHIFFRES as i64;

const ERREUR_DOMAINE: &str = "result is not a real number";
const HORS_LIMITES: &str = "number out of range";

/// log10(e) = LOG10_E + LOG10_E_BAS (double-double).
const LOG10_E_BAS: f64 = 1.098_319_650_216_765e-17;

/// Chiffres lus exactement dans un rationnel hors du domaine f64.
const CHIFFRES_LECTURE: i64 = 20;

/// Au-delà, un argument rationnel de sin/cos/tan est réduit exactement.
const SEUIL_REDUCTION: i64 = 1024;

/// Ordre de grandeur maximal d’un argument réductible avec PI_DECIMALES.
const EXPOSANT_REDUCTION_MAX: i64 = 180;

/// π · 10^200.
const PI_DECIMALES: &str = "3\
    14159265358979323846264338327950288419716939937510\
    58209749445923078164062862089986280348253421170679\
    82148086513282306647093844609550582231725359408128\
    48111745028410270193852110555964462294895493038196";

/// Valeur approchée `mantisse · 10^exposant`.
///
/// `exposant == 0` : la mantisse est la valeur elle-même (cas f64 ordinaire).
/// Sinon la valeur sort du domaine f64 et `1 <= |mantisse| < 10`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Approche {
    mantisse: f64,
    exposant: i64,
}

impl Approche {
    pub const ZERO: Approche = Approche {
        mantisse: 0.0,
        exposant: 0,
    };

    pub fn reel(x: f64) -> Result<Self, String> {
        if x.is_nan() {
            return Err(ERREUR_DOMAINE.into());
        }
        if x.is_infinite() {
            return Err(HORS_LIMITES.into());
        }
        Ok(Approche {
            mantisse: x,
            exposant: 0,
        })
    }

    /// Lecture d’un rationnel exact, sans passer par l’infini du f64.
    pub fn depuis_rationnel(r: &BigRational) -> Result<Self, String> {
        if r.is_zero() {
            return Ok(Self::ZERO);
        }
        if let Some(x) = r.to_f64().filter(|x| x.is_normal()) {
            return Self::reel(x);
        }

        // |r|·10^decalage a environ CHIFFRES_LECTURE chiffres
        let n = r.numer().abs();
        let d = r.denom();
        let bits = n.bits() as i64 - d.bits() as i64;
        let k = (bits as f64 * std::f64::consts::LOG10_2).floor() as i64;
        let decalage = CHIFFRES_LECTURE - k;

        let q = if decalage >= 0 {
            n * puissance_dix(decalage)? / d
        } else {
            n / (d * puissance_dix(-decalage)?)
        };
        let m = q.to_f64().ok_or(HORS_LIMITES)?;
        let m = if r.is_negative() { -m } else { m };
        Self::replie(m, -decalage)
    }

    /// Valeur f64 (±inf ou 0 hors du domaine).
    pub fn vers_f64(self) -> f64 {
        if self.exposant == 0 {
            return self.mantisse;
        }
        decale(self.mantisse, self.exposant)
    }

    fn est_zero(self) -> bool {
        self.mantisse == 0.0
    }

    fn est_negatif(self) -> bool {
        self.mantisse < 0.0
    }

    /// (m, e) avec 1 <= |m| < 10.
    fn echelle(self) -> (f64, i64) {
        let m = self.mantisse;
        if m == 0.0 {
            return (0.0, 0);
        }
        let k = m.abs().log10().floor() as i64;
        let mut m = decale(m, -k);
        let mut e = self.exposant + k;
        if m.abs() >= 10.0 {
            m /= 10.0;
            e += 1;
        } else if m.abs() < 1.0 {
            m *= 10.0;
            e -= 1;
        }
        (m, e)
    }

    /// Normalise, puis revient au f64 ordinaire si la valeur y tient.
    fn replie(m: f64, e: i64) -> Result<Self, String> {
        if m.is_nan() {
            return Err(ERREUR_DOMAINE.into());
        }
        if m.is_infinite() {
            return Err(HORS_LIMITES.into());
        }
        let (m, e) = Approche {
            mantisse: m,
            exposant: e,
        }
        .echelle();
        if m == 0.0 {
            return Ok(Self::ZERO);
        }
        if e.abs() <= 300 {
            let v = decale(m, e);
            if v.is_normal() {
                return Self::reel(v);
            }
        }
        Ok(Approche {
            mantisse: m,
            exposant: e,
        })
    }

    fn oppose(self) -> Self {
        Approche {
            mantisse: -self.mantisse,
            exposant: self.exposant,
        }
    }

    fn add(self, b: Self) -> Result<Self, String> {
        if self.exposant == 0 && b.exposant == 0 {
            let s = self.mantisse + b.mantisse;
            if s.is_finite() {
                return Self::reel(s);
            }
        }
        let (ma, ea) = self.echelle();
        let (mb, eb) = b.echelle();
        if ma == 0.0 {
            return Ok(b);
        }
        if mb == 0.0 {
            return Ok(self);
        }
        let e = ea.max(eb);
        Self::replie(decale(ma, ea - e) + decale(mb, eb - e), e)
    }

    fn mul(self, b: Self) -> Result<Self, String> {
        if self.exposant == 0 && b.exposant == 0 {
            let p = self.mantisse * b.mantisse;
            if p.is_normal() || self.est_zero() || b.est_zero() {
                return Self::reel(p);
            }
        }
        let (ma, ea) = self.echelle();
        let (mb, eb) = b.echelle();
        Self::replie(ma * mb, somme(ea, eb)?)
    }

    fn div(self, b: Self) -> Result<Self, String> {
        // division par un zéro approché (l’exact a déjà produit zoo sinon)
        if b.est_zero() {
            return Err(HORS_LIMITES.into());
        }
        if self.exposant == 0 && b.exposant == 0 {
            let q = self.mantisse / b.mantisse;
            if q.is_normal() || self.est_zero() {
                return Self::reel(q);
            }
        }
        let (ma, ea) = self.echelle();
        let (mb, eb) = b.echelle();
        Self::replie(ma / mb, somme(ea, -eb)?)
    }

    fn racine(self) -> Result<Self, String> {
        if self.est_negatif() {
            return Err(ERREUR_DOMAINE.into());
        }
        if self.exposant == 0 {
            return Self::reel(self.mantisse.sqrt());
        }
        let (mut m, mut e) = self.echelle();
        if e % 2 != 0 {
            m *= 10.0;
            e -= 1;
        }
        Self::replie(m.sqrt(), e / 2)
    }

    fn puissance_entiere(self, n: i64) -> Result<Self, String> {
        if self.exposant == 0 {
            if let Ok(k) = i32::try_from(n) {
                let p = self.mantisse.powi(k);
                if p.is_normal() || (self.est_zero() && n > 0) {
                    return Self::reel(p);
                }
            }
        }
        if self.est_zero() {
            return if n > 0 {
                Ok(Self::ZERO)
            } else {
                Err(HORS_LIMITES.into())
            };
        }

        // exponentiation rapide, mantisse renormalisée à chaque étape
        let mut acc = (1.0, 0);
        let mut base = self.echelle();
        let mut k = n.unsigned_abs();
        while k > 0 {
            if k & 1 == 1 {
                acc = produit_normalise(acc, base)?;
            }
            k >>= 1;
            if k > 0 {
                base = produit_normalise(base, base)?;
            }
        }

        let r = Self::replie(acc.0, acc.1)?;
        if n < 0 {
            Self::reel(1.0)?.div(r)
        } else {
            Ok(r)
        }
    }

    fn puissance(self, y: Self) -> Result<Self, String> {
        if self.exposant == 0 && y.exposant == 0 {
            let p = self.mantisse.powf(y.mantisse);
            if p.is_nan() {
                return Err(ERREUR_DOMAINE.into());
            }
            if p.is_normal() || (p == 0.0 && self.est_zero()) {
                return Self::reel(p);
            }
        }
        if self.est_negatif() {
            return Err(ERREUR_DOMAINE.into());
        }
        if self.est_zero() {
            return if y.est_negatif() {
                Err(HORS_LIMITES.into())
            } else {
                Ok(Self::ZERO)
            };
        }
        let (m, e) = self.echelle();
        dix_puissance(y.vers_f64() * (m.log10() + e as f64))
    }

    fn ln(self) -> Result<Self, String> {
        if self.est_negatif() {
            return Err(ERREUR_DOMAINE.into());
        }
        if self.est_zero() {
            return Err(HORS_LIMITES.into());
        }
        if self.exposant == 0 {
            return Self::reel(self.mantisse.ln());
        }
        let (m, e) = self.echelle();
        Self::reel(m.ln() + e as f64 * std::f64::consts::LN_10)
    }
}

impl fmt::Display for Approche {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let texte = if self.exposant == 0 {
            format_approx(self.mantisse)
        } else {
            format_echelle(self.mantisse, self.exposant)
        };
        f.write_str(&texte)
    }
}

/* ------------------------ Outils ------------------------ */

fn somme(a: i64, b: i64) -> Result<i64, String> {
    a.checked_add(b).ok_or_else(|| HORS_LIMITES.to_string())
}

fn produit_normalise(a: (f64, i64), b: (f64, i64)) -> Result<(f64, i64), String> {
    Ok(Approche {
        mantisse: a.0 * b.0,
        exposant: somme(a.1, b.1)?,
    }
    .echelle())
}

/// m·10^k, par tranches de puissances exactes.
fn decale(m: f64, k: i64) -> f64 {
    if k.abs() <= 22 {
        let p = 10f64.powi(k.unsigned_abs() as i32);
        return if k < 0 { m / p } else { m * p };
    }
    let k = k.clamp(-800, 800);
    let moitie = k / 2;
    decale(decale(m, moitie), k - moitie)
}

fn puissance_dix(k: i64) -> Result<BigInt, String> {
    let k = u32::try_from(k).map_err(|_| HORS_LIMITES.to_string())?;
    Ok(BigInt::from(10u32).pow(k))
}

/// 10^t pour un t quelconque (partie entière -> exposant).
fn dix_puissance(t: f64) -> Result<Approche, String> {
    if !t.is_finite() || t.abs() > 1e15 {
        return Err(HORS_LIMITES.into());
    }
    let e = t.floor();
    Approche::replie(10f64.powf(t - e), e as i64)
}

/// e^x ; hors du domaine f64, passage par log10 avec log10(e) en double-double.
fn exponentielle(x: f64) -> Result<Approche, String> {
    if x.is_nan() {
        return Err(ERREUR_DOMAINE.into());
    }
    let v = x.exp();
    if v.is_normal() {
        return Approche::reel(v);
    }
    if !x.is_finite() || x.abs() > 1e15 {
        return if x < 0.0 {
            Ok(Approche::ZERO)
        } else {
            Err(HORS_LIMITES.into())
        };
    }
    let haut = x * std::f64::consts::LOG10_E;
    let erreur = x.mul_add(std::f64::consts::LOG10_E, -haut);
    let e = haut.floor();
    let fraction = (haut - e) + erreur + x * LOG10_E_BAS;
    Approche::replie(10f64.powf(fraction), e as i64)
}

/* ------------------------ Trigonométrie ------------------------ */

fn trig(f: Fonction, x: &Expr) -> Result<Approche, String> {
    let deux = BigRational::from_integer(BigInt::from(2));

    // c·π : réduction exacte de c dans [0, 2)
    if let Some(c) = x.coeff_pi() {
        if c.abs() >= deux {
            let c = mod_rationnel(&c, 2).to_f64().ok_or(HORS_LIMITES)?;
            return Approche::reel(f.applique_f64(c * std::f64::consts::PI));
        }
    }

    if let Expr::Rat(r) = x {
        if r.abs() > BigRational::from_integer(BigInt::from(SEUIL_REDUCTION)) {
            return trig_reduite(f, r);
        }
    }

    let v = evalue(x)?.vers_f64();
    if !v.is_finite() {
        return Err(HORS_LIMITES.into());
    }
    Approche::reel(f.applique_f64(v))
}

/// f(r) avec r = 2kπ + h + b, |h + b| <= π, b correction de l’arrondi de h.
fn trig_reduite(f: Fonction, r: &BigRational) -> Result<Approche, String> {
    let limite = BigRational::from_integer(puissance_dix(EXPOSANT_REDUCTION_MAX)?);
    if r.abs() > limite {
        return Err(HORS_LIMITES.into());
    }

    let pi: BigInt = PI_DECIMALES
        .parse()
        .map_err(|_| HORS_LIMITES.to_string())?;
    let deux_pi = BigRational::new(pi * 2, puissance_dix(200)?);
    let tours = (r / &deux_pi).round();
    let reste = r - tours * deux_pi;

    let h = reste.to_f64().ok_or(HORS_LIMITES)?;
    let h_exact = BigRational::from_float(h).ok_or(HORS_LIMITES)?;
    let b = (reste - h_exact).to_f64().ok_or(HORS_LIMITES)?;

    let (s, c) = h.sin_cos();
    let v = match f {
        Fonction::Sin => s + c * b,
        Fonction::Cos => c - s * b,
        Fonction::Tan => {
            let t = s / c;
            t + b * (1.0 + t * t)
        }
        autre => autre.applique_f64(h + b),
    };
    Approche::reel(v)
}

/* ------------------------ Évaluation ------------------------ */

/// Évalue une expression sans variable libre.
pub fn evalue(e: &Expr) -> Result<Approche, String> {
    use Expr::*;

    match e {
        Rat(r) => Approche::depuis_rationnel(r),
        Pi => Approche::reel(std::f64::consts::PI),
        E => Approche::reel(std::f64::consts::E),
        Indefini => Err("undefined result".into()),
        Var(s) => Err(format!("cannot approximate free symbol '{s}'")),

        Sqrt(x) => evalue(x)?.racine(),

        // e^n : log10(e) précis plutôt que n multiplications
        PowInt(x, n) if **x == E => exponentielle(*n as f64),
        PowInt(x, n) => evalue(x)?.puissance_entiere(*n),

        Pow(x, y) => evalue(x)?.puissance(evalue(y)?),

        App(f, x) => match f {
            Fonction::Sin | Fonction::Cos | Fonction::Tan => trig(*f, x),
            Fonction::Exp => exponentielle(evalue(x)?.vers_f64()),
            Fonction::Ln => evalue(x)?.ln(),
            _ => Approche::reel(f.applique_f64(evalue(x)?.vers_f64())),
        },

        Add(a, b) => evalue(a)?.add(evalue(b)?),
        Sub(a, b) => evalue(a)?.add(evalue(b)?.oppose()),
        Mul(a, b) => evalue(a)?.mul(evalue(b)?),
        Div(a, b) => evalue(a)?.div(evalue(b)?),
    }
}

/* ------------------------ Affichage ------------------------ */

/// Affichage approché à CHIFFRES chiffres significatifs.
pub fn format_approx(x: f64) -> String {
    format_echelle(x, 0)
}

/// x·10^decalage à CHIFFRES chiffres significatifs.
fn format_echelle(x: f64, decalage: i64) -> String {
    if x.is_nan() {
        return "nan".to_string();
    }
    if x.is_infinite() {
        return if x > 0.0 { "oo" } else { "-oo" }.to_string();
    }
    if x == 0.0 {
        return "0".to_string();
    }

    // arrondi correct délégué au formateur : d.dddddddddddddde±x
    let sci = format!("{:.*e}", CHIFFRES - 1, x.abs());
    let Some((mantisse, exposant)) = sci.split_once('e') else {
        return sci;
    };
    let exposant = exposant.parse::<i64>().unwrap_or(0) + decalage;
    let chiffres: String = mantisse.chars().filter(char::is_ascii_digit).collect();

    let signe = if x < 0.0 { "-" } else { "" };

    if MIN_FIXE < exposant && exposant < MAX_FIXE {
        if exposant < 0 {
            let zeros = "0".repeat((-exposant - 1) as usize);
            return format!("{signe}0.{zeros}{chiffres}");
        }
        let (entiere, fraction) = chiffres.split_at(exposant as usize + 1);
        return format!("{signe}{entiere}.{fraction}");
    }

    let (tete, queue) = chiffres.split_at(1);
    format!("{signe}{tete}.{queue}e{exposant:+}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noyau::expr::{entier, rat};

    fn dix_puissance_exacte(n: i64) -> Expr {
        Expr::PowInt(Box::new(entier(10)), n).simplify()
    }

    fn texte(e: &Expr) -> String {
        evalue(e).unwrap().to_string()
    }

    #[test]
    fn notation_fixe() {
        assert_eq!(format_approx(1.0), "1.00000000000000");
        assert_eq!(format_approx(0.5), "0.500000000000000");
        assert_eq!(format_approx(std::f64::consts::PI), "3.14159265358979");
        assert_eq!(format_approx(-2.5), "-2.50000000000000");
        assert_eq!(format_approx(0.0001), "0.000100000000000000");
        assert_eq!(format_approx(1e14), "100000000000000.");
    }

    #[test]
    fn notation_scientifique() {
        assert_eq!(format_approx(1e20), "1.00000000000000e+20");
        assert_eq!(format_approx(1e15), "1.00000000000000e+15");
        assert_eq!(format_approx(1e-5), "1.00000000000000e-5");
    }

    #[test]
    fn arrondi_qui_change_d_exposant() {
        assert_eq!(format_approx(9.999999999999999), "10.0000000000000");
    }

    #[test]
    fn speciaux() {
        assert_eq!(format_approx(0.0), "0");
        assert_eq!(format_approx(f64::INFINITY), "oo");
        assert_eq!(format_approx(f64::NEG_INFINITY), "-oo");
    }

    #[test]
    fn evaluation() {
        let e = Expr::Mul(Box::new(rat(1, 2)), Box::new(Expr::Sqrt(Box::new(entier(2)))));
        assert_eq!(texte(&e), "0.707106781186548");

        let e = Expr::App(Fonction::Exp, Box::new(entier(1)));
        assert_eq!(texte(&e), "2.71828182845905");
    }

    #[test]
    fn domaine_et_variables() {
        let racine_neg = Expr::Sqrt(Box::new(entier(-1)));
        assert!(evalue(&racine_neg).is_err());

        let ln_neg = Expr::App(Fonction::Ln, Box::new(entier(-2)));
        assert!(evalue(&ln_neg).is_err());

        assert!(evalue(&Expr::Var("x".into())).is_err());
    }

    #[test]
    fn rationnels_hors_du_domaine_f64() {
        let grand = dix_puissance_exacte(400);
        assert!(matches!(grand, Expr::Rat(_)));
        assert_eq!(texte(&grand), "1.00000000000000e+400");

        let petit = dix_puissance_exacte(-400);
        assert_eq!(texte(&petit), "1.00000000000000e-400");

        let Expr::Rat(r) = dix_puissance_exacte(400) else {
            unreachable!()
        };
        let tiers = Expr::Rat(-r / BigRational::from_integer(BigInt::from(3)));
        assert_eq!(texte(&tiers), "-3.33333333333333e+399");
    }

    #[test]
    fn exponentielle_geante() {
        let e1000 = Expr::PowInt(Box::new(Expr::E), 1000);
        assert_eq!(texte(&e1000), "1.97007111401705e+434");

        let inverse = Expr::PowInt(Box::new(Expr::E), -1000);
        assert_eq!(texte(&inverse), "5.07595889754946e-435");

        // retour dans le domaine f64 : 10^400 / 10^399
        let quotient = Expr::Div(
            Box::new(dix_puissance_exacte(400)),
            Box::new(dix_puissance_exacte(399)),
        );
        assert_eq!(texte(&quotient), "10.0000000000000");
    }

    #[test]
    fn operations_mixtes_a_grande_echelle() {
        let somme = Expr::Add(Box::new(dix_puissance_exacte(400)), Box::new(entier(1)));
        assert_eq!(texte(&somme), "1.00000000000000e+400");

        let racine = Expr::Sqrt(Box::new(dix_puissance_exacte(401)));
        assert_eq!(texte(&racine), "3.16227766016838e+200");

        let ln = Expr::App(Fonction::Ln, Box::new(dix_puissance_exacte(400)));
        assert_eq!(texte(&ln), "921.034037197618");
    }

    #[test]
    fn sinus_d_un_grand_argument() {
        let e = Expr::App(Fonction::Sin, Box::new(dix_puissance_exacte(100)));
        assert_eq!(texte(&e), "-0.372376123661277");

        let trop = Expr::App(Fonction::Sin, Box::new(dix_puissance_exacte(200)));
        assert!(evalue(&trop).unwrap_err().contains("out of range"));
    }
}
