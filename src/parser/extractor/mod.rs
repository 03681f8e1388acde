//
//  mod.rs
//  Swagdoc
//
//  Created by hak (tharun)
//

mod handlers;
pub(crate) mod helpers;

pub use handlers::extract_handlers;
