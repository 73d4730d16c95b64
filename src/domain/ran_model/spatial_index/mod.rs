pub mod kd_tree;
pub mod spatial_index;
