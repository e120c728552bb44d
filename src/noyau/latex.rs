// src/noyau/latex.rs
//
// Onglet LaTeX (expérimental) : traduction d’un sous-ensemble de LaTeX vers la
// syntaxe texte du noyau, ensuite évaluée normalement.
//
// Reconnu :
// - \frac{a}{b} (\dfrac, \tfrac), \sqrt{x}, \sqrt[n]{x}
// - \cdot, \times, \div, \pi, \left, \right, espacements (\, \; \! \quad)
// - \sin \cos \tan \arcsin \arccos \arctan \ln \log \exp
// - x^{...}, x^2, groupes { } ( ) [ ]
// - produit implicite : 2\pi, 2x, xy, (a)(b)

use super::rpn::PROFONDEUR_MAX;

/// Traduit une expression LaTeX en expression texte pour le noyau.
pub fn latex_vers_expression(latex: &str) -> Result<String, String> {
    let mut lecteur = Lecteur {
        chars: latex.chars().collect(),
        i: 0,
        profondeur: 0,
    };
    let sortie = lecteur.expression(None)?;
    if sortie.is_empty() {
        return Err("empty expression".into());
    }
    Ok(sortie)
}

fn fonction_latex(commande: &str) -> Option<&'static str> {
    let nom = match commande {
        "sin" => "sin",
        "cos" => "cos",
        "tan" => "tan",
        "arcsin" => "asin",
        "arccos" => "acos",
        "arctan" => "atan",
        "ln" | "log" => "ln",
        "exp" => "exp",
        _ => return None,
    };
    Some(nom)
}

/// Texte produit, avec insertion du produit implicite entre deux opérandes.
#[derive(Default)]
struct Sortie {
    texte: String,
    apres_operande: bool,
}

impl Sortie {
    fn operande(&mut self, s: &str) {
        if self.apres_operande {
            self.texte.push('*');
        }
        self.texte.push_str(s);
        self.apres_operande = true;
    }

    fn operateur(&mut self, s: &str) {
        self.texte.push_str(s);
        self.apres_operande = false;
    }

    fn exposant(&mut self, s: &str) {
        self.texte.push_str("^(");
        self.texte.push_str(s);
        self.texte.push(')');
        self.apres_operande = true;
    }
}

struct Lecteur {
    chars: Vec<char>,
    i: usize,
    /// Imbrication courante (groupes, arguments), bornée par PROFONDEUR_MAX.
    profondeur: usize,
}

impl Lecteur {
    fn imbrique<T>(
        &mut self,
        lire: impl FnOnce(&mut Self) -> Result<T, String>,
    ) -> Result<T, String> {
        if self.profondeur > PROFONDEUR_MAX {
            return Err("nesting too deep".into());
        }
        self.profondeur += 1;
        let r = lire(self);
        self.profondeur -= 1;
        r
    }

    fn courant(&self) -> Option<char> {
        self.chars.get(self.i).copied()
    }

    fn saute_blancs(&mut self) {
        while matches!(self.courant(), Some(c) if c.is_whitespace()) {
            self.i += 1;
        }
    }

    /// Lit jusqu’au délimiteur fermant `fin` (consommé), ou jusqu’à la fin si None.
    fn expression(&mut self, fin: Option<char>) -> Result<String, String> {
        self.imbrique(|l| l.expression_plate(fin))
    }

    fn expression_plate(&mut self, fin: Option<char>) -> Result<String, String> {
        let mut out = Sortie::default();

        while let Some(c) = self.courant() {
            if Some(c) == fin {
                self.i += 1;
                return Ok(out.texte);
            }

            match c {
                c if c.is_whitespace() => self.i += 1,

                c if c.is_ascii_digit() || c == '.' => {
                    let debut = self.i;
                    while matches!(self.courant(), Some(d) if d.is_ascii_digit() || d == '.') {
                        self.i += 1;
                    }
                    let nombre: String = self.chars[debut..self.i].iter().collect();
                    out.operande(&nombre);
                }

                // une lettre = un symbole (convention LaTeX : xy = x·y)
                c if c.is_ascii_alphabetic() => {
                    self.i += 1;
                    out.operande(&c.to_string());
                }

                '+' | '-' | '*' | '/' => {
                    self.i += 1;
                    out.operateur(&c.to_string());
                }

                '(' | '[' | '{' => {
                    self.i += 1;
                    let ferme = match c {
                        '(' => ')',
                        '[' => ']',
                        _ => '}',
                    };
                    let inner = self.expression(Some(ferme))?;
                    out.operande(&format!("({inner})"));
                }

                '^' => {
                    self.i += 1;
                    let e = self.argument()?;
                    out.exposant(&e);
                }

                '\\' => {
                    self.i += 1;
                    self.commande(&mut out)?;
                }

                ')' | ']' | '}' => return Err(format!("unbalanced '{c}'")),

                _ => return Err(format!("unsupported LaTeX character '{c}'")),
            }
        }

        match fin {
            None => Ok(out.texte),
            Some(f) => Err(format!("missing '{f}'")),
        }
    }

    /// Argument d’un exposant ou d’une fonction : groupe {..}/(..)/[..], ou un seul atome.
    fn argument(&mut self) -> Result<String, String> {
        self.imbrique(Self::argument_plat)
    }

    fn argument_plat(&mut self) -> Result<String, String> {
        self.saute_blancs();
        match self.courant() {
            Some('{') => {
                self.i += 1;
                self.expression(Some('}'))
            }
            Some('(') => {
                self.i += 1;
                self.expression(Some(')'))
            }
            Some('[') => {
                self.i += 1;
                self.expression(Some(']'))
            }
            Some(c) if c.is_ascii_digit() || c.is_ascii_alphabetic() => {
                self.i += 1;
                Ok(c.to_string())
            }
            Some('\\') => {
                self.i += 1;
                let mut out = Sortie::default();
                self.commande(&mut out)?;
                Ok(out.texte)
            }
            _ => Err("missing argument".into()),
        }
    }

    /// Groupe obligatoire {..}.
    fn groupe(&mut self) -> Result<String, String> {
        self.saute_blancs();
        if self.courant() != Some('{') {
            return Err("expected '{'".into());
        }
        self.i += 1;
        self.expression(Some('}'))
    }

    fn nom_commande(&mut self) -> String {
        let debut = self.i;
        while matches!(self.courant(), Some(c) if c.is_ascii_alphabetic()) {
            self.i += 1;
        }
        if self.i == debut {
            // commande d’un seul symbole : \, \; \! \  \{
            if let Some(c) = self.courant() {
                self.i += 1;
                return c.to_string();
            }
        }
        self.chars[debut..self.i].iter().collect()
    }

    fn commande(&mut self, out: &mut Sortie) -> Result<(), String> {
        let nom = self.nom_commande();

        match nom.as_str() {
            "frac" | "dfrac" | "tfrac" => {
                let a = self.groupe()?;
                let b = self.groupe()?;
                out.operande(&format!("(({a})/({b}))"));
            }

            "sqrt" => {
                self.saute_blancs();
                let indice = if self.courant() == Some('[') {
                    self.i += 1;
                    Some(self.expression(Some(']'))?)
                } else {
                    None
                };
                let x = self.groupe()?;
                match indice {
                    Some(n) => out.operande(&format!("(({x})^(1/({n})))")),
                    None => out.operande(&format!("sqrt({x})")),
                }
            }

            "cdot" | "times" => out.operateur("*"),
            "div" => out.operateur("/"),
            "pi" => out.operande("pi"),

            // délimiteurs : \left( ... \right) ; \left. est invisible
            "left" | "right" => {
                self.saute_blancs();
                if self.courant() == Some('.') {
                    self.i += 1;
                }
            }

            "," | ";" | "!" | " " | ":" | "quad" | "qquad" => {}

            "mathrm" | "operatorname" => {
                let texte = self.groupe()?;
                match fonction_latex(&texte) {
                    Some(f) => {
                        let x = self.argument()?;
                        out.operande(&format!("{f}({x})"));
                    }
                    None => out.operande(&texte),
                }
            }

            autre => match fonction_latex(autre) {
                Some(f) => {
                    self.saute_blancs();
                    if self.courant() == Some('^') {
                        return Err(format!("powers of \\{autre} are not supported"));
                    }
                    let x = self.argument()?;
                    out.operande(&format!("{f}({x})"));
                }
                None => return Err(format!("unsupported LaTeX command '\\{autre}'")),
            },
        }
        Ok(())
    }
}
