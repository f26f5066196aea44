mod export_integration;
mod gemini_backend_integration;
mod lesson_flow_integration;
