pub mod search_routes;
