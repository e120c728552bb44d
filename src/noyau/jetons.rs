// src/noyau/jetons.rs

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::One;

use super::expr::EXPOSANT_MAX;

#[derive(Clone, Debug, PartialEq)]
pub enum Tok {
    Num(BigRational),

    // Fonctions, constantes et variables.
    // NOTE: le parse (RPN->Expr) décide via la table des symboles.
    Ident(String),

    Plus,
    Minus,
    Star,
    Slash,
    Caret, // ^ ou **

    // moins unaire (produit par to_rpn, jamais par tokenize)
    Neg,

    LPar,
    RPar,
}

/// Tokenize une chaîne en jetons.
/// Supporte:
/// - nombres décimaux exacts (12, 0.25, .5, 1e-3, 2.5E4) -> Num(rationnel)
/// - opérateurs + - * / ^ ** (et × ÷ −)
/// - parenthèses ( )
/// - identifiants [a-zA-Z_][a-zA-Z0-9_]* (normalisés en minuscules)
/// - π (=> ident "pi"), √ (=> ident "sqrt" ; √12 lu comme sqrt(12))
/// - juxtaposition “2π”, “3√2” (la forme affichée par format_exact) => produit
pub fn tokenize(s: &str) -> Result<Vec<Tok>, String> {
    let mut out = Vec::new();
    let chars: Vec<char> = s.chars().collect();
    let mut i: usize = 0;

    while i < chars.len() {
        let c = chars[i];

        if c.is_whitespace() {
            i += 1;
            continue;
        }

        match c {
            '(' => {
                out.push(Tok::LPar);
                i += 1;
                continue;
            }
            ')' => {
                out.push(Tok::RPar);
                i += 1;
                continue;
            }
            '+' => {
                out.push(Tok::Plus);
                i += 1;
                continue;
            }
            '-' | '−' => {
                out.push(Tok::Minus);
                i += 1;
                continue;
            }
            '*' | '×' => {
                // ** = puissance
                if c == '*' && chars.get(i + 1) == Some(&'*') {
                    out.push(Tok::Caret);
                    i += 2;
                } else {
                    out.push(Tok::Star);
                    i += 1;
                }
                continue;
            }
            '/' | '÷' => {
                out.push(Tok::Slash);
                i += 1;
                continue;
            }
            '^' => {
                out.push(Tok::Caret);
                i += 1;
                continue;
            }
            _ => {}
        }

        if c == 'π' {
            juxtaposition(&mut out);
            out.push(Tok::Ident("pi".to_string()));
            i += 1;
            continue;
        }

        // √ : sqrt ; suivi directement d’un nombre => sqrt(nombre)
        if c == '√' {
            juxtaposition(&mut out);
            out.push(Tok::Ident("sqrt".to_string()));
            i += 1;
            if i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                let (n, suite) = lire_nombre(&chars, i)?;
                out.push(Tok::LPar);
                out.push(Tok::Num(n));
                out.push(Tok::RPar);
                i = suite;
            }
            continue;
        }

        // Identifiants ASCII : [a-zA-Z_][a-zA-Z0-9_]*
        if c.is_ascii_alphabetic() || c == '_' {
            let start = i;
            i += 1;
            while i < chars.len() && (chars[i].is_ascii_alphanumeric() || chars[i] == '_') {
                i += 1;
            }
            let word: String = chars[start..i].iter().collect();
            out.push(Tok::Ident(word.to_lowercase()));
            continue;
        }

        if c.is_ascii_digit() || c == '.' {
            let (n, suite) = lire_nombre(&chars, i)?;
            out.push(Tok::Num(n));
            i = suite;
            continue;
        }

        return Err(format!("unexpected character '{c}'"));
    }

    Ok(out)
}

/// “2π”, “(1+1)√3” : produit implicite devant π et √ uniquement.
fn juxtaposition(out: &mut Vec<Tok>) {
    if matches!(out.last(), Some(Tok::Num(_)) | Some(Tok::RPar)) {
        out.push(Tok::Star);
    }
}

/// Lit un littéral décimal à partir de `debut` ; renvoie (valeur exacte, index suivant).
fn lire_nombre(chars: &[char], debut: usize) -> Result<(BigRational, usize), String> {
    let mut i = debut;

    let mut chiffres = String::new();
    while i < chars.len() && chars[i].is_ascii_digit() {
        chiffres.push(chars[i]);
        i += 1;
    }

    let mut decimales = String::new();
    if i < chars.len() && chars[i] == '.' {
        i += 1;
        while i < chars.len() && chars[i].is_ascii_digit() {
            decimales.push(chars[i]);
            i += 1;
        }
    }

    if chiffres.is_empty() && decimales.is_empty() {
        return Err("invalid number '.'".into());
    }

    // exposant décimal : seulement si 'e' est suivi d’un chiffre (sinon c’est la constante e)
    let mut exposant: i64 = 0;
    if i < chars.len() && (chars[i] == 'e' || chars[i] == 'E') {
        let mut j = i + 1;
        let negatif = match chars.get(j) {
            Some('-') => {
                j += 1;
                true
            }
            Some('+') => {
                j += 1;
                false
            }
            _ => false,
        };
        if j < chars.len() && chars[j].is_ascii_digit() {
            let debut_exp = j;
            while j < chars.len() && chars[j].is_ascii_digit() {
                j += 1;
            }
            let txt: String = chars[debut_exp..j].iter().collect();
            let e = txt
                .parse::<i64>()
                .ok()
                .filter(|e| *e <= EXPOSANT_MAX)
                .ok_or("exponent too large")?;
            exposant = if negatif { -e } else { e };
            i = j;
        }
    }

    let mantisse_txt = format!("{chiffres}{decimales}");
    let mantisse =
        BigInt::parse_bytes(mantisse_txt.as_bytes(), 10).ok_or("invalid number")?;

    // 12.34e1 = 1234 * 10^(1-2)
    let decalage = exposant - decimales.len() as i64;
    let dix = BigInt::from(10);
    let valeur = if decalage >= 0 {
        BigRational::from_integer(mantisse * num_traits::pow(dix, decalage as usize))
    } else {
        let den = num_traits::pow(dix, decalage.unsigned_abs() as usize);
        BigRational::new(mantisse, den)
    };

    Ok((valeur, i))
}

/// Format utilitaire (journal debug) : liste de jetons en texte.
pub fn format_tokens(tokens: &[Tok]) -> String {
    fn format_rat(r: &BigRational) -> String {
        let n = r.numer();
        let d = r.denom();
        if d.is_one() {
            format!("{n}")
        } else {
            format!("{n}/{d}")
        }
    }

    tokens
        .iter()
        .map(|t| match t {
            Tok::Num(r) => format_rat(r),
            Tok::Ident(name) => name.clone(),

            Tok::Plus => "+".to_string(),
            Tok::Minus => "-".to_string(),
            Tok::Star => "*".to_string(),
            Tok::Slash => "/".to_string(),
            Tok::Caret => "^".to_string(),
            Tok::Neg => "neg".to_string(),

            Tok::LPar => "(".to_string(),
            Tok::RPar => ")".to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}
