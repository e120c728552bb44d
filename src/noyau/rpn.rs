// src/noyau/rpn.rs
//
// Shunting-yard -> RPN -> AST
// Objectif:
// - Convertir une suite de Tok en RPN (postfix), en refusant les suites invalides
//   (opérateur sans opérande, parenthèses déséquilibrées, “2 3”…)
// - Puis reconstruire Expr avec la table des symboles du mode d’angle
//
// Règles:
// - Ident(name):
//    - fonction de la table => doit être suivie de '(' ; sortie après la parenthèse fermante
//    - constante de la table (pi, e) => atome
//    - sinon => variable libre (Expr::Var)
// - Moins unaire : jeton Neg (préfixe), plus fort que * mais plus faible que ^
//   (-2^2 = -4, 2^-1 = 1/2)

use super::expr::{neg, Expr};
use super::jetons::Tok;
use super::symboles::TableSymboles;

/// Profondeur maximale de parenthèses (anti-débordement de pile).
pub const PROFONDEUR_MAX: usize = 200;

/// Nombre maximal de jetons d’une expression.
pub const JETONS_MAX: usize = 4096;

fn precedence(t: &Tok) -> i32 {
    match t {
        Tok::Plus | Tok::Minus => 1,
        Tok::Star | Tok::Slash => 2,
        Tok::Neg => 3,
        Tok::Caret => 4,
        _ => 0,
    }
}

fn is_right_associative(t: &Tok) -> bool {
    matches!(t, Tok::Caret)
}

fn symbole(t: &Tok) -> String {
    match t {
        Tok::Num(_) => "number".to_string(),
        Tok::Ident(n) => n.clone(),
        Tok::Plus => "+".to_string(),
        Tok::Minus | Tok::Neg => "-".to_string(),
        Tok::Star => "*".to_string(),
        Tok::Slash => "/".to_string(),
        Tok::Caret => "^".to_string(),
        Tok::LPar => "(".to_string(),
        Tok::RPar => ")".to_string(),
    }
}

/// Convertit une suite de jetons en RPN (notation polonaise inversée).
///
/// Exemple:
///   tokens: [Ident("sin"), LPar, Ident("pi"), Slash, Num(2), RPar]
///   rpn:    [Ident("pi"), Num(2), Slash, Ident("sin")]
pub fn to_rpn(tokens: &[Tok], table: &TableSymboles) -> Result<Vec<Tok>, String> {
    if tokens.is_empty() {
        return Err("empty expression".into());
    }
    if tokens.len() > JETONS_MAX {
        return Err("expression too long".into());
    }

    let mut out: Vec<Tok> = Vec::with_capacity(tokens.len());
    let mut ops: Vec<Tok> = Vec::new();

    // vrai quand la grammaire attend un opérande (début, après un opérateur ou '(')
    let mut attend_valeur = true;
    let mut profondeur: usize = 0;

    for (i, tok) in tokens.iter().enumerate() {
        match tok {
            Tok::Num(_) | Tok::Ident(_) if !attend_valeur => {
                return Err(format!("missing operator before '{}'", symbole(tok)));
            }

            Tok::Num(_) => {
                out.push(tok.clone());
                attend_valeur = false;
            }

            Tok::Ident(name) if table.est_fonction(name) => {
                if !matches!(tokens.get(i + 1), Some(Tok::LPar)) {
                    return Err(format!("function '{name}' must be followed by '('"));
                }
                // fonction : on la garde sur la pile (elle sortira après son argument)
                ops.push(tok.clone());
            }

            Tok::Ident(_) => {
                out.push(tok.clone());
                attend_valeur = false;
            }

            Tok::LPar => {
                if !attend_valeur {
                    return Err("missing operator before '('".into());
                }
                profondeur += 1;
                if profondeur > PROFONDEUR_MAX {
                    return Err("too many nested parentheses".into());
                }
                ops.push(Tok::LPar);
            }

            Tok::RPar => {
                if attend_valeur {
                    return Err("unexpected ')'".into());
                }

                // dépile jusqu’à '('
                let mut ouvert = false;
                while let Some(top) = ops.pop() {
                    if matches!(top, Tok::LPar) {
                        ouvert = true;
                        break;
                    }
                    out.push(top);
                }
                if !ouvert {
                    return Err("unbalanced parentheses".into());
                }
                profondeur -= 1;

                // si une fonction est au sommet, on la sort aussi
                if matches!(ops.last(), Some(Tok::Ident(_))) {
                    if let Some(f) = ops.pop() {
                        out.push(f);
                    }
                }
            }

            // moins unaire
            Tok::Minus if attend_valeur => ops.push(Tok::Neg),

            // plus unaire : sans effet
            Tok::Plus if attend_valeur => {}

            Tok::Plus | Tok::Minus | Tok::Star | Tok::Slash | Tok::Caret => {
                if attend_valeur {
                    return Err(format!("missing operand before '{}'", symbole(tok)));
                }

                // dépile tant que la précédence/associativité exige de sortir l'opérateur du haut
                while let Some(top) = ops.last() {
                    if matches!(top, Tok::LPar | Tok::Ident(_)) {
                        break;
                    }

                    let p_top = precedence(top);
                    let p_tok = precedence(tok);

                    let doit_pop = if is_right_associative(tok) {
                        p_top > p_tok
                    } else {
                        p_top >= p_tok
                    };
                    if !doit_pop {
                        break;
                    }
                    if let Some(op) = ops.pop() {
                        out.push(op);
                    }
                }

                ops.push(tok.clone());
                attend_valeur = true;
            }

            Tok::Neg => return Err("unexpected token".into()),
        }
    }

    if attend_valeur {
        return Err("unexpected end of expression".into());
    }

    // vide la pile ops
    while let Some(op) = ops.pop() {
        if matches!(op, Tok::LPar) {
            return Err("unbalanced parentheses".into());
        }
        out.push(op);
    }

    Ok(out)
}

/// Construit une Expr à partir d’une RPN, selon la table des symboles.
pub fn from_rpn(rpn: &[Tok], table: &TableSymboles) -> Result<Expr, String> {
    let mut st: Vec<Expr> = Vec::new();

    for tok in rpn.iter().cloned() {
        match tok {
            Tok::Num(r) => st.push(Expr::Rat(r)),

            Tok::Neg => {
                let a = st.pop().ok_or("invalid expression")?;
                st.push(neg(a));
            }

            Tok::Plus | Tok::Minus | Tok::Star | Tok::Slash | Tok::Caret => {
                let b = st.pop().ok_or("invalid expression")?;
                let a = st.pop().ok_or("invalid expression")?;

                let (a, b) = (Box::new(a), Box::new(b));
                st.push(match tok {
                    Tok::Plus => Expr::Add(a, b),
                    Tok::Minus => Expr::Sub(a, b),
                    Tok::Star => Expr::Mul(a, b),
                    Tok::Slash => Expr::Div(a, b),
                    _ => Expr::Pow(a, b),
                });
            }

            Tok::Ident(name) => {
                if table.est_fonction(&name) {
                    let x = st.pop().ok_or("function without argument")?;
                    let e = table
                        .applique(&name, x)
                        .ok_or_else(|| format!("unknown function '{name}'"))?;
                    st.push(e);
                } else if let Some(c) = table.constante(&name) {
                    st.push(c);
                } else {
                    st.push(Expr::Var(name));
                }
            }

            Tok::LPar | Tok::RPar => return Err("unexpected parenthesis in RPN".into()),
        }
    }

    match (st.pop(), st.is_empty()) {
        (Some(e), true) => Ok(e),
        _ => Err("invalid expression".into()),
    }
}
