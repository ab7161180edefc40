pub mod region_filter_effect;
pub mod tile_size;
pub mod triangulizor;
