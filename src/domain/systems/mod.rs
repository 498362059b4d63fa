pub mod craft_movement;
