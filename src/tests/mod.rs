mod test_inverse;
