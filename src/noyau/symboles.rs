//! src/noyau/symboles.rs
//!
//! Mode d’angle + table des symboles reconnus par le parseur.
//!
//! Deux tables fixes seulement : `TableSymboles::radian()` et `TableSymboles::degre()`.
//! Seules les entrées sin/cos/tan changent d’une table à l’autre (argument × π/180
//! en degrés) ; asin/acos/atan, ln, pi et e sont liés à l’identique.

use num_bigint::BigInt;
use num_rational::BigRational;

use super::expr::{Expr, Fonction};

/// Mode d’angle de la calculatrice standard. Non persisté : `Radian` à chaque lancement.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ModeAngle {
    #[default]
    Radian,
    Degre,
}

impl ModeAngle {
    /// Seule transition : bascule explicite par l’utilisateur.
    pub fn basculer(self) -> Self {
        match self {
            ModeAngle::Radian => ModeAngle::Degre,
            ModeAngle::Degre => ModeAngle::Radian,
        }
    }

    pub fn table(self) -> TableSymboles {
        match self {
            ModeAngle::Radian => TableSymboles::radian(),
            ModeAngle::Degre => TableSymboles::degre(),
        }
    }

    /// Clé de traduction du bouton de mode.
    pub fn cle_traduction(self) -> &'static str {
        match self {
            ModeAngle::Radian => "mode_rad",
            ModeAngle::Degre => "mode_deg",
        }
    }
}

/// Liaison des entrées trigonométriques directes (sin/cos/tan).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum LiaisonTrig {
    Directe,
    Degres,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Primitive {
    Racine,
    Fonction(Fonction),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TableSymboles {
    trig: LiaisonTrig,
}

impl TableSymboles {
    pub const fn radian() -> Self {
        Self {
            trig: LiaisonTrig::Directe,
        }
    }

    pub const fn degre() -> Self {
        Self {
            trig: LiaisonTrig::Degres,
        }
    }

    pub fn est_fonction(&self, nom: &str) -> bool {
        primitive(nom).is_some()
    }

    /// Constantes liées (identiques dans les deux tables).
    pub fn constante(&self, nom: &str) -> Option<Expr> {
        match nom {
            "pi" => Some(Expr::Pi),
            "e" => Some(Expr::E),
            _ => None,
        }
    }

    /// Construit l’appel `nom(x)` selon la table. None si `nom` n’est pas une fonction.
    pub fn applique(&self, nom: &str, x: Expr) -> Option<Expr> {
        let e = match primitive(nom)? {
            Primitive::Racine => Expr::Sqrt(Box::new(x)),
            Primitive::Fonction(f) if f.est_trig_directe() && self.trig == LiaisonTrig::Degres => {
                Expr::App(f, Box::new(en_radians(x)))
            }
            Primitive::Fonction(f) => Expr::App(f, Box::new(x)),
        };
        Some(e)
    }
}

fn primitive(nom: &str) -> Option<Primitive> {
    let p = match nom {
        "sqrt" => Primitive::Racine,
        "sin" => Primitive::Fonction(Fonction::Sin),
        "cos" => Primitive::Fonction(Fonction::Cos),
        "tan" => Primitive::Fonction(Fonction::Tan),
        "asin" => Primitive::Fonction(Fonction::Asin),
        "acos" => Primitive::Fonction(Fonction::Acos),
        "atan" => Primitive::Fonction(Fonction::Atan),
        // log sans base = logarithme naturel
        "ln" | "log" => Primitive::Fonction(Fonction::Ln),
        "exp" => Primitive::Fonction(Fonction::Exp),
        _ => return None,
    };
    Some(p)
}

/// x ↦ x·(π/180)
fn en_radians(x: Expr) -> Expr {
    let cent_quatre_vingts = Expr::Rat(BigRational::from_integer(BigInt::from(180)));
    Expr::Mul(
        Box::new(x),
        Box::new(Expr::Div(Box::new(Expr::Pi), Box::new(cent_quatre_vingts))),
    )
}
