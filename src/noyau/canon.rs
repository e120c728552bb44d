// src/noyau/canon.rs
//
// Canonicalisation forte (déterministe) :
// - coeff·π reconnu sur tout un sous-arbre => forme unique (90·π/180 -> π/2)
// - aplatissement Add/Sub et Mul
// - regroupement des termes semblables (x + x -> 2*x, √2/2 + √2/2 -> √2)
// - regroupement des facteurs égaux en puissances (e*e -> e^2)
// - division par un rationnel => produit par l’inverse (forme unique pour √2/2 et 1/√2)
// - tri déterministe des termes/facteurs (ordre total), constante rationnelle en dernier
// - √(n) -> a*√b (extraction des carrés parfaits) pour n rationnel > 0

use crate::noyau::expr::{multiple_de_pi, simplifie_pow_int, Expr};
use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, Zero};
use std::cmp::Ordering;

/// Borne des essais de division pour l’extraction des carrés (anti-gel sur gros entiers).
const ESSAI_MAX: u32 = 100_000;

pub fn canon_expr(e: Expr) -> Expr {
    use Expr::*;

    if !matches!(e, Pi | Rat(_)) {
        if let Some(c) = e.coeff_pi() {
            return multiple_de_pi(c);
        }
    }

    match e {
        Rat(_) | Pi | E | Indefini | Var(_) => e,

        Sqrt(x) => canon_sqrt(canon_expr(*x)),
        PowInt(x, n) => canon_pow(canon_expr(*x), n),

        Pow(b, x) => {
            let b = canon_expr(*b);
            let x = canon_expr(*x);
            if matches!(b, Indefini) || matches!(x, Indefini) {
                return Indefini;
            }
            Pow(Box::new(b), Box::new(x))
        }

        App(f, x) => match canon_expr(*x) {
            Indefini => Indefini,
            x => App(f, Box::new(x)),
        },

        Add(a, b) => canon_addsub(Add(Box::new(canon_expr(*a)), Box::new(canon_expr(*b)))),
        Sub(a, b) => canon_addsub(Sub(Box::new(canon_expr(*a)), Box::new(canon_expr(*b)))),

        Mul(a, b) => canon_mul(Mul(Box::new(canon_expr(*a)), Box::new(canon_expr(*b)))),

        Div(a, b) => canon_div(canon_expr(*a), canon_expr(*b)),
    }
}

/* ------------------------ utilitaires signe ------------------------ */

fn is_zero(e: &Expr) -> bool {
    matches!(e, Expr::Rat(r) if r.is_zero())
}

fn is_one(e: &Expr) -> bool {
    matches!(e, Expr::Rat(r) if r.is_one())
}

/// Renvoie (negatif?, valeur_absolue). Regarde aussi le coefficient de tête d’un produit.
fn split_signe(e: Expr) -> (bool, Expr) {
    use Expr::*;
    match e {
        Rat(r) if r.is_negative() => (true, Rat(-r)),
        Sub(a, b) if is_zero(&a) => (true, *b),
        Mul(a, b) => {
            let (negatif, a) = split_signe(*a);
            if negatif && is_one(&a) {
                (true, *b)
            } else {
                (negatif, Mul(Box::new(a), b))
            }
        }
        other => (false, other),
    }
}

/// Sépare le coefficient rationnel : 3*x -> (3, x), -(√2) -> (-1, √2), 5 -> (5, 1).
fn separe_coeff(e: Expr) -> (BigRational, Expr) {
    use Expr::*;
    match e {
        Rat(r) => (r, Rat(BigRational::one())),
        Sub(a, b) if is_zero(&a) => {
            let (c, reste) = separe_coeff(*b);
            (-c, reste)
        }
        Mul(_, _) => {
            let mut facteurs = Vec::new();
            collect_mul(e, &mut facteurs);

            let mut c = BigRational::one();
            let mut reste = Vec::with_capacity(facteurs.len());
            for f in facteurs {
                match f {
                    Rat(r) => c *= r,
                    autre => reste.push(autre),
                }
            }
            (c, reconstruit_mul(reste))
        }
        autre => (BigRational::one(), autre),
    }
}

/* ------------------------ clef de tri déterministe ------------------------ */

fn rang(e: &Expr) -> u8 {
    use Expr::*;
    match e {
        Rat(_) => 0,
        Var(_) => 1,
        Sqrt(_) => 2,
        Pi => 3,
        E => 4,
        PowInt(_, _) | Pow(_, _) => 5,
        App(_, _) => 6,
        Mul(_, _) | Div(_, _) => 7,
        Add(_, _) | Sub(_, _) => 8,
        Indefini => 255,
    }
}

fn key_string(e: &Expr) -> String {
    use Expr::*;
    match e {
        Rat(r) => format!("R{}/{}", r.numer(), r.denom()),
        Var(s) => format!("VAR({s})"),
        Pi => "PI".to_string(),
        E => "E".to_string(),
        Indefini => "INDEF".to_string(),

        Sqrt(x) => format!("SQRT({})", key_string(x)),
        PowInt(x, n) => format!("POW({},{n})", key_string(x)),
        Pow(x, y) => format!("POWX({},{})", key_string(x), key_string(y)),
        App(f, x) => format!("{}({})", f.nom().to_uppercase(), key_string(x)),

        Add(a, b) => format!("ADD({},{})", key_string(a), key_string(b)),
        Sub(a, b) => format!("SUB({},{})", key_string(a), key_string(b)),
        Mul(a, b) => format!("MUL({},{})", key_string(a), key_string(b)),
        Div(a, b) => format!("DIV({},{})", key_string(a), key_string(b)),
    }
}

fn cmp_expr(a: &Expr, b: &Expr) -> Ordering {
    rang(a)
        .cmp(&rang(b))
        .then_with(|| key_string(a).cmp(&key_string(b)))
}

/* ------------------------ Add/Sub ------------------------ */

fn collect_addsub(e: Expr, out: &mut Vec<Expr>) {
    use Expr::*;
    match e {
        Add(a, b) => {
            collect_addsub(*a, out);
            collect_addsub(*b, out);
        }
        Sub(a, b) => {
            collect_addsub(*a, out);
            out.push(crate::noyau::expr::neg(*b));
        }
        other => out.push(other),
    }
}

/// c·reste, sous forme canonique.
fn construit_terme(c: BigRational, reste: Expr) -> Expr {
    if c.is_one() {
        return reste;
    }
    if reste == Expr::Pi {
        return multiple_de_pi(c);
    }
    canon_mul(Expr::Mul(Box::new(Expr::Rat(c)), Box::new(reste)))
}

fn canon_addsub(e: Expr) -> Expr {
    let mut termes: Vec<Expr> = Vec::new();
    collect_addsub(e, &mut termes);

    if termes.iter().any(|t| matches!(t, Expr::Indefini)) {
        return Expr::Indefini;
    }

    // Regroupement : constante rationnelle + termes semblables (même “reste”).
    let mut somme_rat = BigRational::zero();
    let mut groupes: Vec<(String, BigRational, Expr)> = Vec::new();

    for t in termes {
        let (c, reste) = separe_coeff(t);
        if let Expr::Rat(r) = &reste {
            somme_rat += c * r;
            continue;
        }
        let cle = key_string(&reste);
        match groupes.iter_mut().find(|(k, _, _)| *k == cle) {
            Some((_, total, _)) => *total += c,
            None => groupes.push((cle, c, reste)),
        }
    }

    groupes.retain(|(_, c, _)| !c.is_zero());
    groupes.sort_by(|a, b| cmp_expr(&a.2, &b.2));

    let mut v: Vec<Expr> = groupes
        .into_iter()
        .map(|(_, c, reste)| construit_terme(c, reste))
        .collect();

    if !somme_rat.is_zero() {
        v.push(Expr::Rat(somme_rat));
    }

    let mut termes = v.into_iter();
    let Some(mut acc) = termes.next() else {
        return Expr::Rat(BigRational::zero());
    };

    // Reconstruction “jolie” : si le terme suivant est négatif, on utilise Sub(acc, abs).
    for t in termes {
        let (negatif, abs) = split_signe(t);
        acc = if negatif {
            Expr::Sub(Box::new(acc), Box::new(abs))
        } else {
            Expr::Add(Box::new(acc), Box::new(abs))
        };
    }
    acc
}

/* ------------------------ Mul ------------------------ */

fn collect_mul(e: Expr, out: &mut Vec<Expr>) {
    match e {
        Expr::Mul(a, b) => {
            collect_mul(*a, out);
            collect_mul(*b, out);
        }
        other => out.push(other),
    }
}

fn reconstruit_mul(facteurs: Vec<Expr>) -> Expr {
    let mut it = facteurs.into_iter();
    let Some(mut acc) = it.next() else {
        return Expr::Rat(BigRational::one());
    };
    for f in it {
        acc = Expr::Mul(Box::new(acc), Box::new(f));
    }
    acc
}

fn ajoute_facteur(groupes: &mut Vec<(String, Expr, i64)>, base: Expr, n: i64) {
    let cle = key_string(&base);
    if let Some(g) = groupes.iter_mut().find(|g| g.0 == cle) {
        if let Some(total) = g.2.checked_add(n) {
            g.2 = total;
            return;
        }
    }
    groupes.push((cle, base, n));
}

fn canon_mul(e: Expr) -> Expr {
    use Expr::*;

    let mut pile: Vec<Expr> = Vec::new();
    collect_mul(e, &mut pile);

    if pile.iter().any(|x| matches!(x, Indefini)) {
        return Indefini;
    }

    let mut signe_neg = false;
    let mut prod_rat = BigRational::one();
    let mut groupes: Vec<(String, Expr, i64)> = Vec::new();

    while let Some(f) = pile.pop() {
        // 0 * ... = 0
        if is_zero(&f) {
            return Rat(BigRational::zero());
        }

        let (neg_f, abs_f) = split_signe(f);
        if neg_f {
            signe_neg = !signe_neg;
        }

        match abs_f {
            Rat(r) => prod_rat *= r,
            Mul(_, _) => collect_mul(abs_f, &mut pile),
            PowInt(base, n) => ajoute_facteur(&mut groupes, *base, n),
            autre => ajoute_facteur(&mut groupes, autre, 1),
        }
    }

    let mut v: Vec<Expr> = Vec::with_capacity(groupes.len());
    for (_, base, n) in groupes {
        if n == 0 {
            continue;
        }
        // (√2)^2 -> 2, x^1 -> x
        match simplifie_pow_int(base, n) {
            Rat(r) => prod_rat *= r,
            Indefini => return Indefini,
            autre => v.push(autre),
        }
    }

    if prod_rat.is_zero() {
        return Rat(BigRational::zero());
    }
    if signe_neg {
        prod_rat = -prod_rat;
    }

    if v.is_empty() {
        return Rat(prod_rat);
    }
    if v.len() == 1 && v[0] == Pi {
        return multiple_de_pi(prod_rat);
    }

    v.sort_by(cmp_expr);
    if !prod_rat.is_one() {
        v.insert(0, Rat(prod_rat));
    }
    reconstruit_mul(v)
}

/* ------------------------ Div ------------------------ */

fn canon_div(a: Expr, b: Expr) -> Expr {
    use Expr::*;

    if matches!(a, Indefini) || matches!(b, Indefini) || is_zero(&b) {
        return Indefini;
    }
    if is_zero(&a) {
        return Rat(BigRational::zero());
    }

    // a/r => a*(1/r)
    if let Rat(r) = &b {
        let inverse = BigRational::one() / r;
        return canon_mul(Mul(Box::new(a), Box::new(Rat(inverse))));
    }

    // a/(-b) => (-a)/b
    let (neg_b, den) = split_signe(b);
    let num = if neg_b {
        canon_mul(Mul(Box::new(Rat(-BigRational::one())), Box::new(a)))
    } else {
        a
    };

    Div(Box::new(num), Box::new(den))
}

/* ------------------------ PowInt / Sqrt ------------------------ */

fn canon_pow(base: Expr, n: i64) -> Expr {
    if matches!(base, Expr::Indefini) {
        return Expr::Indefini;
    }
    simplifie_pow_int(base, n)
}

fn canon_sqrt(x: Expr) -> Expr {
    use Expr::*;

    let r = match &x {
        Indefini => return Indefini,
        Rat(r) if r.is_zero() => return Rat(BigRational::zero()),
        Rat(r) if r.is_positive() => r.clone(),
        _ => return Sqrt(Box::new(x)),
    };

    // √(p/q) = √(p·q)/q, puis √(s²·t) = s·√t
    let q = r.denom().clone();
    let n = r.numer() * &q;
    let (s, t) = extrait_carre_parfait(&n);
    let coeff = BigRational::new(s, q);

    if t.is_one() {
        return Rat(coeff);
    }
    let racine = Sqrt(Box::new(Rat(BigRational::from_integer(t))));
    if coeff.is_one() {
        return racine;
    }
    Mul(Box::new(Rat(coeff)), Box::new(racine))
}

/// Décompose n > 0 en n = s² * t (essais de division bornés par ESSAI_MAX).
fn extrait_carre_parfait(n: &BigInt) -> (BigInt, BigInt) {
    let mut reste = n.clone();
    let mut s = BigInt::one();

    let mut p: u32 = 2;
    while p <= ESSAI_MAX {
        let pb = BigInt::from(p);
        let p2 = &pb * &pb;
        if p2 > reste {
            break;
        }

        while (&reste % &p2).is_zero() {
            reste /= &p2;
            s *= &pb;
        }

        p = if p == 2 { 3 } else { p + 2 };
    }

    (s, reste)
}
