// src/calcul.rs
//
// Pipeline de la calculatrice standard :
//   texte brut -> normaliser -> (vide ? rien) -> substituer -> moteur -> entrée d’historique
//
// Le moteur symbolique est une boîte noire derrière `MoteurSymbolique` ;
// le noyau exact du crate en est l’implémentation par défaut.

use log::debug;

use crate::noyau::latex::latex_vers_expression;
use crate::noyau::pretraitement::{normaliser, substituer};
use crate::noyau::{eval_expression, ModeAngle, Resultat};
use crate::preferences::TableCorrespondances;

/// Évalue une expression déjà prétraitée, avec la table de symboles du mode.
pub trait MoteurSymbolique {
    fn evaluer(&self, expr: &str, mode: ModeAngle) -> Result<Resultat, String>;
}

/// Noyau exact (rationnels, π, e).
#[derive(Clone, Copy, Debug, Default)]
pub struct NoyauExact;

impl MoteurSymbolique for NoyauExact {
    fn evaluer(&self, expr: &str, mode: ModeAngle) -> Result<Resultat, String> {
        eval_expression(expr, &mode.table())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Issue {
    Succes(Resultat),
    /// Message complet, préfixe localisé compris.
    Erreur(String),
}

/// Une ligne d’historique : le texte tel que saisi + son issue.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntreeHistorique {
    pub entree: String,
    pub issue: Issue,
}

impl EntreeHistorique {
    pub fn resultat(&self) -> Option<&Resultat> {
        match &self.issue {
            Issue::Succes(r) => Some(r),
            Issue::Erreur(_) => None,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct Calculatrice<M = NoyauExact> {
    moteur: M,
}

impl<M: MoteurSymbolique> Calculatrice<M> {
    pub fn new(moteur: M) -> Self {
        Self { moteur }
    }

    /// Onglet standard. `None` si la saisie ne contient que des blancs
    /// (aucune évaluation, aucune entrée).
    pub fn calculer(
        &self,
        brut: &str,
        mode: ModeAngle,
        table: &TableCorrespondances,
        prefixe_erreur: &str,
    ) -> Option<EntreeHistorique> {
        let normalise = normaliser(brut);
        if normalise.is_empty() {
            return None;
        }

        let expr = substituer(&normalise, table.iter());
        debug!("calcul: {brut:?} -> {expr:?} ({mode:?})");

        let issue = match self.moteur.evaluer(&expr, mode) {
            Ok(r) => Issue::Succes(r),
            Err(msg) => {
                debug!("calcul: échec {expr:?}: {msg}");
                Issue::Erreur(format!("{prefixe_erreur}{msg}"))
            }
        };

        Some(EntreeHistorique {
            entree: brut.to_string(),
            issue,
        })
    }

    /// Onglet LaTeX : toujours en radians, sans correspondances.
    /// Le résultat affiché est la valeur numérique (forme exacte si elle n’existe pas).
    pub fn calculer_latex(&self, brut: &str, prefixe_erreur: &str) -> Option<EntreeHistorique> {
        let latex = brut.trim();
        if latex.is_empty() {
            return None;
        }

        let issue = match latex_vers_expression(latex)
            .and_then(|expr| self.moteur.evaluer(&expr, ModeAngle::Radian))
        {
            Ok(r) => Issue::Succes(Resultat {
                exact: r.approx.unwrap_or(r.exact),
                approx: None,
            }),
            Err(msg) => {
                debug!("calcul LaTeX: échec {latex:?}: {msg}");
                Issue::Erreur(format!("{prefixe_erreur}{msg}"))
            }
        };

        Some(EntreeHistorique {
            entree: latex.to_string(),
            issue,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::cell::RefCell;

    /// Moteur factice : enregistre chaque appel et renvoie l’expression reçue.
    #[derive(Default)]
    struct MoteurEspion {
        appels: RefCell<Vec<(String, ModeAngle)>>,
    }

    impl MoteurSymbolique for MoteurEspion {
        fn evaluer(&self, expr: &str, mode: ModeAngle) -> Result<Resultat, String> {
            self.appels.borrow_mut().push((expr.to_string(), mode));
            Ok(Resultat {
                exact: expr.to_string(),
                approx: Some("0".into()),
            })
        }
    }

    const PREFIXE: &str = "<ERROR>: ";

    #[test]
    fn saisie_vide_aucun_appel() {
        let calc = Calculatrice::new(MoteurEspion::default());
        let table = TableCorrespondances::par_defaut();
        for brut in ["", "   ", "\n\t \r\n"] {
            assert!(calc.calculer(brut, ModeAngle::Radian, &table, PREFIXE).is_none());
        }
        assert!(calc.moteur.appels.borrow().is_empty());
        assert!(calc.calculer_latex("  ", PREFIXE).is_none());
        assert!(calc.moteur.appels.borrow().is_empty());
    }

    #[test]
    fn le_moteur_recoit_le_texte_substitue() {
        let calc = Calculatrice::new(MoteurEspion::default());
        let mut table = TableCorrespondances::vide();
        table.inserer("arctan", "atan");

        let e = calc
            .calculer(" arctan (1)\n", ModeAngle::Degre, &table, PREFIXE)
            .unwrap();
        assert_eq!(
            calc.moteur.appels.borrow().as_slice(),
            [("atan(1)".to_string(), ModeAngle::Degre)]
        );
        // l’entrée garde le texte brut
        assert_eq!(e.entree, " arctan (1)\n");
    }

    #[test]
    fn latex_en_radians_sans_correspondances() {
        let calc = Calculatrice::new(MoteurEspion::default());
        let e = calc.calculer_latex(r"  \arctan 1 ", PREFIXE).unwrap();
        assert_eq!(
            calc.moteur.appels.borrow().as_slice(),
            [("atan(1)".to_string(), ModeAngle::Radian)]
        );
        assert_eq!(e.entree, r"\arctan 1");
        assert_eq!(e.resultat().map(|r| r.exact.as_str()), Some("0"));
    }

    #[test]
    fn sinus_en_degres_avec_le_noyau() {
        let calc = Calculatrice::<NoyauExact>::default();
        let table = TableCorrespondances::par_defaut();

        let e = calc.calculer("sin(90)", ModeAngle::Degre, &table, PREFIXE).unwrap();
        let r = e.resultat().unwrap();
        assert_eq!(r.exact, "1");
        assert_eq!(r.approx.as_deref(), Some("1.00000000000000"));

        let e = calc.calculer("sin(pi/2)", ModeAngle::Radian, &table, PREFIXE).unwrap();
        let r = e.resultat().unwrap();
        assert_eq!(r.exact, "1");
        assert_eq!(r.approx.as_deref(), Some("1.00000000000000"));
    }

    #[test]
    fn correspondance_arctan_avec_le_noyau() {
        let calc = Calculatrice::<NoyauExact>::default();
        let table = TableCorrespondances::par_defaut();
        let e = calc.calculer("arctan(1)", ModeAngle::Radian, &table, PREFIXE).unwrap();
        assert_eq!(e.resultat().unwrap().exact, "π/4");
    }

    #[test]
    fn erreur_de_syntaxe_prefixee() {
        let calc = Calculatrice::<NoyauExact>::default();
        let table = TableCorrespondances::par_defaut();

        let e = calc.calculer("2+*3", ModeAngle::Radian, &table, PREFIXE).unwrap();
        assert_eq!(e.entree, "2+*3");
        match &e.issue {
            Issue::Erreur(msg) => assert!(msg.starts_with("<ERROR>: "), "{msg}"),
            Issue::Succes(r) => panic!("succès inattendu: {r:?}"),
        }

        let e = calc.calculer("2+*3", ModeAngle::Radian, &table, "<错误>: ").unwrap();
        assert!(matches!(&e.issue, Issue::Erreur(m) if m.starts_with("<错误>: ")));
    }

    #[test]
    fn latex_avec_le_noyau() {
        let calc = Calculatrice::<NoyauExact>::default();
        let e = calc.calculer_latex(r"\frac{1}{2} + \sqrt{4}", PREFIXE).unwrap();
        let r = e.resultat().unwrap();
        assert_eq!(r.exact, "2.50000000000000");
        assert_eq!(r.approx, None);

        let e = calc.calculer_latex(r"\frac{1}", PREFIXE).unwrap();
        assert!(e.resultat().is_none());
    }

    #[test]
    fn latex_trop_imbrique_devient_une_erreur() {
        let calc = Calculatrice::<NoyauExact>::default();
        let profond = format!("{}1{}", "{".repeat(20_000), "}".repeat(20_000));
        let e = calc.calculer_latex(&profond, PREFIXE).unwrap();
        assert!(matches!(&e.issue, Issue::Erreur(m) if m == "<ERROR>: nesting too deep"));
    }
}
