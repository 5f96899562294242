pub mod supabase;

pub use supabase::{is_unavailable, SupabaseClient};
