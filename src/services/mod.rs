pub mod calculation_service;
