mod fake_service;
