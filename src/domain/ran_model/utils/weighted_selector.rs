use rand::Rng;

/// Cumulative-weight table used for slice and mobility pattern assignment.
///
/// A uniform draw in `[0, 1)` selects the first item whose cumulative weight
/// meets or exceeds the draw. Draws beyond the last cumulative weight (weights
/// summing to slightly less than 1) select the last item.
#[derive(Debug, Clone)]
pub struct WeightedSelector<T> {
    items: Vec<T>,
    cumulative: Vec<f64>,
}

impl<T> WeightedSelector<T> {
    pub fn new(entries: impl IntoIterator<Item = (T, f64)>) -> Self {
        let mut items = Vec::new();
        let mut cumulative = Vec::new();
        let mut collected = 0.0;

        for (item, weight) in entries {
            collected += weight;
            items.push(item);
            cumulative.push(collected);
        }

        WeightedSelector { items, cumulative }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn total_weight(&self) -> f64 {
        self.cumulative.last().copied().unwrap_or(0.0)
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// # Returns
    /// The index selected by `draw`, or `None` if the table is empty.
    pub fn index_for(&self, draw: f64) -> Option<usize> {
        if self.items.is_empty() {
            return None;
        }

        let index = self.cumulative.iter().position(|weight| *weight >= draw).unwrap_or(self.items.len() - 1);
        Some(index)
    }

    pub fn select_index<R: Rng>(&self, rng: &mut R) -> Option<usize> {
        let draw = rng.random::<f64>();
        self.index_for(draw)
    }

    pub fn select<R: Rng>(&self, rng: &mut R) -> Option<&T> {
        self.select_index(rng).map(|index| &self.items[index])
    }
}
