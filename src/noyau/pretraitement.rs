// src/noyau/pretraitement.rs
//
// Prétraitement du texte saisi, avant toute évaluation :
// - normaliser : retire espaces, tabulations et retours à la ligne
// - substituer : remplacements littéraux successifs (alias -> remplacement), dans l’ordre
//
// Les remplacements ne sont pas confluents : une paire voit la sortie des paires
// précédentes (a->b puis b->c transforme "a" en "c"). C’est voulu et testé.

/// Caractères retirés par la normalisation.
const BLANCS: [char; 4] = [' ', '\t', '\n', '\r'];

/// Retire tous les blancs de saisie. Idempotent.
pub fn normaliser(s: &str) -> String {
    s.chars().filter(|c| !BLANCS.contains(c)).collect()
}

/// Applique les correspondances dans l’ordre donné.
/// Chaque occurrence littérale (sans recouvrement, de gauche à droite) est remplacée.
/// Un alias vide est ignoré.
pub fn substituer<'a, I>(s: &str, correspondances: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut courant = s.to_string();
    for (alias, remplacement) in correspondances {
        if alias.is_empty() {
            continue;
        }
        if courant.contains(alias) {
            courant = courant.replace(alias, remplacement);
        }
    }
    courant
}
