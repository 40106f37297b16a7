mod app_flow_test;
mod scripted_test;
