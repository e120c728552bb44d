//! Tests fuzz safe : robustesse + déterminisme + limites contrôlées.
//!
//! But : marteler le pipeline sans brûler la machine.
//! - RNG déterministe (seed fixe)
//! - profondeur bornée
//! - budget temps global
//! - on accepte certaines erreurs attendues (racine d’un négatif, ln d’un négatif)
//! - invariant clé : EXACT == "zoo" <=> approximation == "zoo"

use std::time::{Duration, Instant};

use super::eval::Resultat;
use super::eval_expression;
use super::symboles::ModeAngle;

/* ------------------------ RNG déterministe minimal ------------------------ */

#[derive(Clone)]
struct Rng {
    state: u64,
}
impl Rng {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }
    fn next_u32(&mut self) -> u32 {
        // LCG simple (déterministe)
        self.state = self.state.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.state >> 32) as u32
    }
    fn pick(&mut self, n: u32) -> u32 {
        if n == 0 {
            0
        } else {
            self.next_u32() % n
        }
    }
    fn coin(&mut self) -> bool {
        (self.next_u32() & 1) == 1
    }
}

/* ------------------------ Budget anti-gel ------------------------ */

fn budget(start: Instant, max: Duration) {
    if start.elapsed() > max {
        panic!("budget temps dépassé: {:?}", max);
    }
}

/* ------------------------ Helpers fuzz ------------------------ */

fn is_erreur_attendue(msg: &str) -> bool {
    // Liste blanche : erreurs *normales* pour un fuzz, le domaine réel étant limité.
    msg.contains("not a real number") || msg.contains("out of range")
}

fn check_invariant_indefini(r: &Resultat) {
    let approx_indefinie = r.approx.as_deref() == Some("zoo");
    assert_eq!(
        r.exact == "zoo",
        approx_indefinie,
        "zoo doit être exact ET approché: {r:?}"
    );
}

/* ------------------------ Génération d’expressions (bornée) ------------------------ */

fn gen_rat(rng: &mut Rng) -> String {
    // rationnels simples, incluant 0 (utile pour tester zéros et division par zéro)
    let a = rng.pick(8);
    let b = 1 + rng.pick(8);

    match rng.pick(3) {
        0 => format!("{a}/{b}"),
        1 => format!("{a}.{b}"),
        _ => format!("{a}"),
    }
}

fn gen_coeff_pi(rng: &mut Rng) -> String {
    // coeffs raisonnables, pour rester près des angles spéciaux
    let k = rng.pick(14) as i32 - 6;
    let d = [1, 2, 3, 4, 6, 12][rng.pick(6) as usize];

    if d == 1 {
        format!("{k}*pi")
    } else {
        format!("{k}*pi/{d}")
    }
}

fn gen_atom(rng: &mut Rng) -> String {
    match rng.pick(7) {
        0 | 1 => gen_rat(rng),
        2 => "pi".to_string(),
        3 => "e".to_string(),
        4 => format!("({})", gen_coeff_pi(rng)),
        5 => "sqrt(2)".to_string(),
        _ => "sqrt(-3)".to_string(),
    }
}

fn gen_expr(rng: &mut Rng, depth: usize) -> String {
    if depth == 0 {
        return gen_atom(rng);
    }

    let a = |rng: &mut Rng| gen_expr(rng, depth - 1);

    match rng.pick(11) {
        0 => gen_atom(rng),
        1 => format!("({}+{})", a(rng), a(rng)),
        2 => format!("({}-{})", a(rng), a(rng)),
        3 => format!("({}*{})", a(rng), a(rng)),
        4 => format!("({}/{})", a(rng), a(rng)),
        5 => format!("sin({})", gen_coeff_pi(rng)),
        6 => format!("cos({})", gen_coeff_pi(rng)),
        7 => format!("tan({})", gen_coeff_pi(rng)),
        8 => format!("({})**{}", a(rng), rng.pick(4)),
        9 => format!("ln({})", a(rng)),
        _ => {
            if rng.coin() {
                format!("-{}", a(rng))
            } else {
                format!("sqrt({})", a(rng))
            }
        }
    }
}

/* ------------------------ Helper somme balancée anti pile ------------------------ */

fn somme_balancee(terme: &str, n: usize) -> String {
    let mut items: Vec<String> = (0..n).map(|_| terme.to_string()).collect();
    while items.len() > 1 {
        let mut next = Vec::new();
        let mut i = 0;
        while i < items.len() {
            if i + 1 < items.len() {
                next.push(format!("({}+{})", items[i], items[i + 1]));
                i += 2;
            } else {
                next.push(items[i].clone());
                i += 1;
            }
        }
        items = next;
    }
    items.pop().unwrap_or_else(|| "0".to_string())
}

/* ------------------------ Tests ------------------------ */

#[test]
fn fuzz_safe_determinisme_et_invariant_zoo() {
    let t0 = Instant::now();
    let max = Duration::from_secs(5);

    let mut rng = Rng::new(0xC0FFEE_u64);
    let mut seen_ok = 0usize;

    for i in 0..120 {
        budget(t0, max);

        let expr = gen_expr(&mut rng, 4);
        let mode = if i % 2 == 0 {
            ModeAngle::Radian
        } else {
            ModeAngle::Degre
        };

        let r1 = eval_expression(&expr, &mode.table());
        // Même entrée => même sortie (déterminisme)
        let r2 = eval_expression(&expr, &mode.table());
        assert_eq!(r1, r2, "non déterministe: expr={expr:?}");

        match r1 {
            Ok(r) => {
                check_invariant_indefini(&r);
                assert!(!r.exact.is_empty(), "exact vide: expr={expr:?}");
                seen_ok += 1;
            }
            Err(e) => {
                assert!(
                    is_erreur_attendue(&e),
                    "erreur non attendue: expr={expr:?} err={e}"
                );
            }
        }
    }

    assert!(seen_ok > 10, "trop peu de succès: {seen_ok}");
}

#[test]
fn fuzz_safe_angles_trig_dans_domaine() {
    let t0 = Instant::now();
    let max = Duration::from_secs(2);

    let mut rng = Rng::new(0xBADC0DE_u64);

    for _ in 0..80 {
        budget(t0, max);

        let a = gen_coeff_pi(&mut rng);
        for f in ["sin", "cos", "tan"] {
            let expr = format!("{f}({a})");
            let r = eval_expression(&expr, &ModeAngle::Radian.table())
                .unwrap_or_else(|e| panic!("expr={expr:?} err={e}"));
            check_invariant_indefini(&r);
        }
    }
}

#[test]
fn fuzz_safe_syntaxe_aleatoire_sans_panique() {
    let t0 = Instant::now();
    let max = Duration::from_secs(2);

    let alphabet: Vec<char> = "0123456789.+-*/^()episqrt ln√π×÷ $".chars().collect();
    let mut rng = Rng::new(0x5EED_u64);

    for _ in 0..300 {
        budget(t0, max);

        let n = 1 + rng.pick(16) as usize;
        let s: String = (0..n)
            .map(|_| alphabet[rng.pick(alphabet.len() as u32) as usize])
            .collect();

        // seule exigence : pas de panique, un Ok ou un Err
        let _ = eval_expression(&s, &ModeAngle::Radian.table());
    }
}

#[test]
fn fuzz_safe_somme_balancee_anti_pile() {
    let t0 = Instant::now();
    let max = Duration::from_secs(2);

    let expr = somme_balancee("1/2", 400);
    let r = eval_expression(&expr, &ModeAngle::Radian.table())
        .unwrap_or_else(|e| panic!("err: {e}"));
    budget(t0, max);

    // 400*(1/2) = 200
    assert_eq!(r.exact, "200");
}
