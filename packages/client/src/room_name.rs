//! Random room ids and display names.

use rand::{Rng, seq::IndexedRandom};

/// Names offered when the user does not pick one
pub const NAMES: &[&str] = &[
    "Alice", "Bob", "Charlie", "David", "Eve", "Frank", "Grace", "Heidi", "Ivan", "Judy",
    "Kevin", "Linda", "Mallory", "Nancy", "Oscar", "Peggy", "Quentin", "Randy", "Steve",
    "Trent", "Ursula", "Victor", "Walter", "Xavier", "Yvonne", "Zoe",
];

/// Words room ids are built from
pub const WORDS: &[&str] = &[
    "apple", "book", "cat", "dog", "egg", "fish", "go", "hat", "ice", "jam", "kite", "leaf",
    "moon", "nest", "owl", "pen", "queen", "rain", "sun", "tree", "umbrella", "van", "wolf",
    "xray", "yarn", "zebra", "star", "cloud", "river", "rock", "sand", "mouse", "lamp", "door",
    "car", "bus", "train", "plane", "ship", "shoe", "sock", "ring", "bell", "cake", "milk",
    "corn", "frog", "duck", "rose", "seed",
];

const ROOM_ID_WORDS: usize = 5;

/// Five distinct words in random order, joined with `-`
pub fn generate_room_id<R: Rng + ?Sized>(rng: &mut R) -> String {
    WORDS
        .choose_multiple(rng, ROOM_ID_WORDS)
        .copied()
        .collect::<Vec<_>>()
        .join("-")
}

pub fn pick_display_name<R: Rng + ?Sized>(rng: &mut R) -> String {
    NAMES.choose(rng).copied().unwrap_or(NAMES[0]).to_string()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    #[test]
    fn test_generate_room_id_uses_five_distinct_words() {
        // テスト項目: ルーム ID は単語リストから選んだ重複の無い 5 単語で構成される
        // given (前提条件):
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..100 {
            // when (操作):
            let room_id = generate_room_id(&mut rng);

            // then (期待する結果):
            let words: Vec<&str> = room_id.split('-').collect();
            assert_eq!(words.len(), 5);
            assert!(words.iter().all(|w| WORDS.contains(w)));
            assert_eq!(words.iter().collect::<HashSet<_>>().len(), 5);
        }
    }

    #[test]
    fn test_generate_room_id_is_a_valid_room_id() {
        // テスト項目: 生成したルーム ID はサーバーが受け付ける形式になっている
        // given (前提条件):
        let mut rng = StdRng::seed_from_u64(42);

        // when (操作):
        let room_id = generate_room_id(&mut rng);

        // then (期待する結果):
        assert!(hiroba_server::domain::RoomId::new(room_id).is_ok());
    }

    #[test]
    fn test_pick_display_name_comes_from_list() {
        // テスト項目: 表示名は名前リストから選ばれる
        // given (前提条件):
        let mut rng = StdRng::seed_from_u64(3);

        // when (操作):
        let name = pick_display_name(&mut rng);

        // then (期待する結果):
        assert!(NAMES.contains(&name.as_str()));
    }
}
