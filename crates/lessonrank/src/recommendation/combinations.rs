/// Number of leading filtered activities used to seed lesson plan combinations.
pub const LESSON_PLAN_TOP_ACTIVITIES_LIMIT: usize = 20;
/// Largest lesson plan the generator will ever build.
pub const MAX_LESSON_PLAN_SIZE: usize = 5;

/// Lesson plan sizes to generate for the requested activity count, capped at five.
pub fn plan_sizes(max_activity_count: usize) -> std::ops::RangeInclusive<usize> {
    2..=max_activity_count.min(MAX_LESSON_PLAN_SIZE)
}

/// Yields every `k`-element combination of `0..n` as sorted index vectors, in lexicographic
/// order.
pub fn index_combinations(n: usize, k: usize) -> IndexCombinations {
    IndexCombinations {
        n,
        indices: (0..k).collect(),
        done: k == 0 || k > n,
    }
}

#[derive(Debug, Clone)]
pub struct IndexCombinations {
    n: usize,
    indices: Vec<usize>,
    done: bool,
}

impl Iterator for IndexCombinations {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let current = self.indices.clone();
        let k = self.indices.len();

        // Advance the rightmost index that still has room to move.
        match (0..k).rev().find(|&i| self.indices[i] < self.n - k + i) {
            Some(i) => {
                self.indices[i] += 1;
                for j in i + 1..k {
                    self.indices[j] = self.indices[j - 1] + 1;
                }
            }
            None => self.done = true,
        }

        Some(current)
    }
}

/// Ordered lesson plans drawn from the seed pool, sizes ascending.
pub fn lesson_plans<T: Copy>(seeds: &[T], max_activity_count: usize) -> Vec<Vec<T>> {
    let pool = &seeds[..seeds.len().min(LESSON_PLAN_TOP_ACTIVITIES_LIMIT)];
    if pool.len() < 2 {
        return Vec::new();
    }

    plan_sizes(max_activity_count)
        .filter(|&k| k <= pool.len())
        .flat_map(|k| index_combinations(pool.len(), k))
        .map(|indices| indices.into_iter().map(|i| pool[i]).collect())
        .collect()
}
