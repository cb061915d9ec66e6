use wasm_bindgen::prelude::*;
use pocket_engine::*;

mod balls;
mod game;

use game::PoolTable;

pocket_web::export_game!(PoolTable, "pool-table");
