use super::*;

/// Generation strategy that can optionally keep the starting cell (and its neighbors) free of
/// mines, but other than that is purely random.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomLayoutGenerator {
    seed: u64,
    start: Coord2,
    start_tile: StartTile,
}

impl RandomLayoutGenerator {
    pub fn new(seed: u64, start: Coord2, start_tile: StartTile) -> Self {
        Self {
            seed,
            start,
            start_tile,
        }
    }

    /// No exclusion at all, the start position is irrelevant.
    pub fn unrestricted(seed: u64) -> Self {
        Self::new(seed, (0, 0), StartTile::Random)
    }
}

impl MineLayoutGenerator for RandomLayoutGenerator {
    fn generate(self, config: GameConfig) -> Result<MineLayout> {
        use StartTile::*;
        use rand::prelude::*;

        config.validate()?;
        let total_cells = config.total_cells();
        let size = config.size;

        if !matches!(self.start_tile, Random) && (self.start.0 >= size.0 || self.start.1 >= size.1)
        {
            return Err(GameError::InvalidCoords);
        }

        let neighbors = NeighborIter::new(self.start, size).count() as CellCount;
        let actual_start_tile = match self.start_tile {
            Random => Random,
            SimpleSafe => SimpleSafe,
            AlwaysZero if config.mines + 1 + neighbors > total_cells => {
                log::warn!("Cannot make start cell zero, fallback to simple safe");
                SimpleSafe
            }
            AlwaysZero => AlwaysZero,
        };

        // excluded cells are temporarily marked so they are never picked
        let mut mines: Array2<bool> = Array2::default(size.to_nd_index());
        let mut free_cells = match actual_start_tile {
            Random => total_cells,
            SimpleSafe => {
                mines[self.start.to_nd_index()] = true;
                total_cells - 1
            }
            AlwaysZero => {
                mines[self.start.to_nd_index()] = true;
                for coords in NeighborIter::new(self.start, size) {
                    mines[coords.to_nd_index()] = true;
                }
                total_cells - 1 - neighbors
            }
        };

        let mut rng = SmallRng::seed_from_u64(self.seed);
        let mut mines_placed = 0;
        while mines_placed < config.mines && free_cells > 0 {
            let mut place = rng.random_range(0..free_cells);
            for cell in mines.iter_mut().filter(|cell| !**cell) {
                if place == 0 {
                    *cell = true;
                    break;
                }
                place -= 1;
            }
            mines_placed += 1;
            free_cells -= 1;
        }

        match actual_start_tile {
            Random => {}
            SimpleSafe => {
                mines[self.start.to_nd_index()] = false;
            }
            AlwaysZero => {
                mines[self.start.to_nd_index()] = false;
                for coords in NeighborIter::new(self.start, size) {
                    mines[coords.to_nd_index()] = false;
                }
            }
        }

        let layout = MineLayout::from_mine_mask(mines)?;
        if layout.mine_count() != config.mines {
            log::warn!(
                "Generated layout count mismatch, actual: {}, requested: {}",
                layout.mine_count(),
                config.mines
            );
        }
        Ok(layout)
    }
}
