pub mod background;
pub mod hourly_forecast;
pub mod map_view;
pub mod weather_card;
